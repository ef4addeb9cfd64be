//! Outcome of a state transition.

/// What happened to a request against the session or search state.
///
/// Invalid requests (unknown tab ids, closing the last tab, replacing with no
/// current match) are ignored rather than reported as errors.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request was applied; derived views should be refreshed.
    Applied,
    /// The request was invalid in the current state and nothing changed.
    Ignored,
}

impl Transition {
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}
