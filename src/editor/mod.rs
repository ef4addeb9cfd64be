//! The shared editing surface.
//!
//! Provides a rope-backed text buffer with a selection, plus the
//! toolbar formatting actions that operate on that selection.

mod buffer;
mod format;

pub use buffer::EditorBuffer;
pub use format::FormatAction;
