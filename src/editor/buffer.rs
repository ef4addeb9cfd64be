use std::ops::Range;

use ropey::Rope;

/// The shared editing surface.
///
/// Holds the live text of whichever tab is active, backed by a rope so that
/// splices in the middle of large documents stay cheap. Positions are UTF-8
/// byte offsets; every offset handed back by the buffer sits on a `char`
/// boundary.
pub struct EditorBuffer {
    rope: Rope,
    selection: Range<usize>,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: 0..0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Whether the buffer has been modified since it was last loaded.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after a download).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text covered by `range` (clamped to the buffer).
    pub fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp_range(range);
        let start = self.rope.byte_to_char(range.start);
        let end = self.rope.byte_to_char(range.end);
        self.rope.slice(start..end).to_string()
    }

    /// Replace the whole text, as when a tab is loaded into the surface.
    ///
    /// The selection collapses to the start and the buffer is clean.
    pub fn load(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selection = 0..0;
        self.dirty = false;
    }

    /// Replace the whole text as a user edit (keeps the caret in range).
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selection = self.clamp_range(self.selection.clone());
        self.dirty = true;
    }

    /// The current selection as a byte range. An empty range is a caret.
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// The selected text.
    pub fn selected_text(&self) -> String {
        self.slice(self.selection.clone())
    }

    /// Select `range`, clamped to the buffer and snapped to `char` boundaries.
    pub fn select(&mut self, range: Range<usize>) {
        self.selection = self.clamp_range(range);
    }

    /// Collapse the selection to a caret at its start.
    pub const fn collapse_selection(&mut self) {
        self.selection.end = self.selection.start;
    }

    /// Replace the text in `range` with `replacement`.
    ///
    /// Returns the byte range now occupied by `replacement`. The selection is
    /// moved to a caret after the inserted text.
    pub fn replace_range(&mut self, range: Range<usize>, replacement: &str) -> Range<usize> {
        let range = self.clamp_range(range);
        let start_char = self.rope.byte_to_char(range.start);
        let end_char = self.rope.byte_to_char(range.end);
        if start_char < end_char {
            self.rope.remove(start_char..end_char);
        }
        if !replacement.is_empty() {
            self.rope.insert(start_char, replacement);
        }
        let inserted = range.start..range.start + replacement.len();
        self.selection = inserted.end..inserted.end;
        self.dirty = true;
        inserted
    }

    /// Replace the current selection with `text` (typing or pasting).
    pub fn insert_str(&mut self, text: &str) {
        let selection = self.selection.clone();
        if text.is_empty() && selection.is_empty() {
            return;
        }
        self.replace_range(selection, text);
    }

    /// Byte offset of the start of the line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = self.clamp_offset(offset);
        let line = self.rope.byte_to_line(offset);
        self.rope.line_to_byte(line)
    }

    fn clamp_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_bytes());
        // Snap down to the start of the char containing `offset`.
        self.rope.char_to_byte(self.rope.byte_to_char(offset))
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let start = self.clamp_offset(range.start);
        let end = self.clamp_offset(range.end).max(start);
        start..end
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("len", &self.len())
            .field("lines", &self.line_count())
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .finish()
    }
}
