//! Find and replace.
//!
//! Provides literal text search over the editing surface with:
//! - Case-insensitive matching by default
//! - Wrap-around navigation between matches
//! - Single and bulk replacement, followed by a full re-scan

use std::fmt;
use std::ops::Range;

use regex::{NoExpand, Regex, RegexBuilder};
use tracing::warn;

use crate::editor::EditorBuffer;
use crate::transition::Transition;

/// A match as a byte range into the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub const fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

/// Count shown next to the search field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// No query entered.
    Inactive,
    /// A query with zero matches.
    NoResults,
    /// `current` is one-based.
    At { current: usize, total: usize },
}

impl fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => Ok(()),
            Self::NoResults => f.write_str("No results"),
            Self::At { current, total } => write!(f, "{current} of {total}"),
        }
    }
}

/// Search state for one editing surface.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    query: String,
    case_sensitive: bool,
    pattern: Option<Regex>,
    matches: Vec<MatchSpan>,
    current: Option<usize>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn matches(&self) -> &[MatchSpan] {
        &self.matches
    }

    pub const fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The match the cursor is on, if any.
    pub fn current_match(&self) -> Option<MatchSpan> {
        self.matches.get(self.current?).copied()
    }

    /// Set the query and rescan `text`.
    ///
    /// The query is literal text. The cursor moves to the first match, or to
    /// none when nothing matches. An empty query clears the search.
    pub fn set_query(&mut self, text: &str, query: &str, case_sensitive: bool) {
        self.query = query.to_string();
        self.case_sensitive = case_sensitive;
        self.pattern = compile(query, case_sensitive);
        self.scan(text);
        self.current = if self.matches.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// Flip case sensitivity and rescan immediately.
    pub fn toggle_case_sensitive(&mut self, text: &str) {
        let query = std::mem::take(&mut self.query);
        self.set_query(text, &query, !self.case_sensitive);
    }

    /// Rescan after the text changed underneath the search.
    ///
    /// Keeps the cursor where it was, clamped to the new number of matches.
    pub fn refresh(&mut self, text: &str) {
        self.scan(text);
        self.current = match (self.matches.len(), self.current) {
            (0, _) => None,
            (_, None) => Some(0),
            (n, Some(idx)) => Some(idx.min(n - 1)),
        };
    }

    /// Move to the next match, wrapping to the first.
    pub fn next_match(&mut self) -> Transition {
        let n = self.matches.len();
        if n == 0 {
            return Transition::Ignored;
        }
        self.current = Some(match self.current {
            Some(idx) => (idx + 1) % n,
            None => 0,
        });
        Transition::Applied
    }

    /// Move to the previous match, wrapping to the last.
    pub fn previous_match(&mut self) -> Transition {
        let n = self.matches.len();
        if n == 0 {
            return Transition::Ignored;
        }
        self.current = Some(match self.current {
            Some(idx) => (idx + n - 1) % n,
            None => n - 1,
        });
        Transition::Applied
    }

    /// Replace the current match with `replacement` and rescan.
    ///
    /// Offsets after the edit are stale, so the match list is rebuilt from the
    /// new text rather than shifted.
    pub fn replace_current(&mut self, buffer: &mut EditorBuffer, replacement: &str) -> Transition {
        let Some(span) = self.current_match() else {
            return Transition::Ignored;
        };
        buffer.replace_range(span.range(), replacement);
        self.rescan_from_scratch(&buffer.text());
        Transition::Applied
    }

    /// Replace every match with `replacement` in one pass and rescan.
    ///
    /// `replacement` is inserted verbatim; `$` has no special meaning.
    pub fn replace_all(&mut self, buffer: &mut EditorBuffer, replacement: &str) -> Transition {
        if self.matches.is_empty() {
            return Transition::Ignored;
        }
        let Some(pattern) = self.pattern.as_ref() else {
            return Transition::Ignored;
        };
        let text = buffer.text();
        let replaced = pattern.replace_all(&text, NoExpand(replacement)).into_owned();
        buffer.set_text(&replaced);
        buffer.select(0..0);
        self.rescan_from_scratch(&replaced);
        Transition::Applied
    }

    /// Drop the query and every match, as when the search bar is closed.
    pub fn clear(&mut self) {
        self.query.clear();
        self.pattern = None;
        self.matches.clear();
        self.current = None;
    }

    pub fn status(&self) -> SearchStatus {
        if self.query.is_empty() {
            return SearchStatus::Inactive;
        }
        match self.current {
            Some(idx) if !self.matches.is_empty() => SearchStatus::At {
                current: idx + 1,
                total: self.matches.len(),
            },
            _ => SearchStatus::NoResults,
        }
    }

    fn rescan_from_scratch(&mut self, text: &str) {
        let query = std::mem::take(&mut self.query);
        self.set_query(text, &query, self.case_sensitive);
    }

    fn scan(&mut self, text: &str) {
        self.matches = self.pattern.as_ref().map_or_else(Vec::new, |pattern| {
            pattern
                .find_iter(text)
                .map(|m| MatchSpan {
                    start: m.start(),
                    end: m.end(),
                })
                .collect()
        });
    }
}

/// Build a pattern that matches `query` literally.
fn compile(query: &str, case_sensitive: bool) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(pattern) => Some(pattern),
        Err(err) => {
            warn!(%err, len = query.len(), "search pattern rejected");
            None
        }
    }
}
