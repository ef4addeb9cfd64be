// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchEngine)
    clippy::module_name_repetitions
)]

//! # Marksplit
//!
//! The core of a split-pane markdown editor.
//!
//! Marksplit provides:
//! - Multiple open documents sharing one editing surface
//! - Literal find/replace with match navigation
//! - A live HTML preview with syntax-highlighted code blocks
//! - Proportional scroll coupling between the editor and the preview
//! - Word and character counts
//!
//! ## Architecture
//!
//! Marksplit uses The Elm Architecture (TEA) pattern:
//! - **Model**: Editor state
//! - **Message**: Events and actions
//! - **Update**: State transitions
//!
//! Every request is total: one that does not apply (an unknown tab, closing
//! the last tab, stepping with no matches) is ignored and reported as
//! [`transition::Transition::Ignored`].
//!
//! ## Modules
//!
//! - [`app`]: Editor state, updates and the command-line driver
//! - [`session`]: Open tabs and the shared editing surface
//! - [`editor`]: Text buffer and formatting actions
//! - [`search`]: Find and replace
//! - [`sync`]: Scroll synchronization
//! - [`render`]: Markdown to HTML
//! - [`highlight`]: Syntax highlighting
//! - [`stats`]: Word and character counts
//! - [`files`]: Opening and downloading documents
//! - [`watcher`]: File watching

pub mod app;
pub mod config;
pub mod editor;
pub mod files;
pub mod highlight;
pub mod render;
pub mod search;
pub mod session;
pub mod stats;
pub mod sync;
pub mod transition;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, update};
    pub use crate::render::{MarkdownRenderer, RenderBridge};
    pub use crate::session::{SessionManager, TabId};
    pub use crate::transition::Transition;
}
