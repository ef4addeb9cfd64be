//! Word and character counts shown under the editor.

use std::fmt;

use serde::Serialize;

/// Counts derived from the editor text after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DocumentStats {
    pub words: usize,
    pub characters: usize,
}

impl DocumentStats {
    /// Count whitespace-separated words and raw characters (whitespace
    /// included) in `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }

    /// `"1 word"`, `"3 words"`.
    pub fn words_label(&self) -> String {
        pluralize(self.words, "word", "words")
    }

    /// `"1 character"`, `"0 characters"`.
    pub fn characters_label(&self) -> String {
        pluralize(self.characters, "character", "characters")
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.words_label(), self.characters_label())
    }
}

fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}
