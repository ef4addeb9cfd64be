//! Proportional scroll synchronization between the editor and preview panes.
//!
//! The two panes rarely have the same content height, so positions are
//! mapped by scroll depth (0.0 at the top, 1.0 at the bottom) rather than by
//! pixel offset.

use std::cell::Cell;

/// The two panes of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    /// The pane on the other side of the split.
    pub const fn other(self) -> Self {
        match self {
            Self::Editor => Self::Preview,
            Self::Preview => Self::Editor,
        }
    }
}

/// Geometry of a scrollable pane, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaneMetrics {
    /// Distance scrolled from the top.
    pub scroll_top: f64,
    /// Total height of the content.
    pub scroll_height: f64,
    /// Height of the visible area.
    pub client_height: f64,
}

impl PaneMetrics {
    pub const fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Largest reachable `scroll_top`.
    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// How far down the pane is scrolled.
    ///
    /// The denominator is clamped to at least 1 so that content which fits
    /// without scrolling yields 0 instead of dividing by zero.
    pub fn scroll_ratio(&self) -> f64 {
        self.scroll_top / (self.scroll_height - self.client_height).max(1.0)
    }
}

/// A pane the synchronizer can read from and write to.
pub trait ScrollPane {
    fn metrics(&self) -> PaneMetrics;

    /// Scroll to `top`. Implementations clamp to their scrollable range.
    fn set_scroll_top(&mut self, top: f64);
}

impl ScrollPane for PaneMetrics {
    fn metrics(&self) -> PaneMetrics {
        *self
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top = top.clamp(0.0, self.max_scroll());
    }
}

/// Keeps two panes at the same scroll depth.
///
/// Writing the paired pane's scroll position fires that pane's own scroll
/// handler, which would sync straight back. A guard held for the duration of
/// one pass swallows that echo.
#[derive(Debug)]
pub struct ScrollSync {
    enabled: bool,
    in_pass: Cell<bool>,
}

impl ScrollSync {
    pub const fn new() -> Self {
        Self {
            enabled: true,
            in_pass: Cell::new(false),
        }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip the user toggle; returns the new state.
    pub const fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Whether a pass is currently writing to a pane.
    pub fn is_syncing(&self) -> bool {
        self.in_pass.get()
    }

    /// React to a scroll of `source` by moving `target` to the same depth.
    ///
    /// Returns the `scroll_top` written to `target`, or `None` when
    /// synchronization is off or this call is the echo of our own write.
    pub fn sync<S, T>(&self, source: &S, target: &mut T) -> Option<f64>
    where
        S: ScrollPane + ?Sized,
        T: ScrollPane + ?Sized,
    {
        if !self.enabled {
            return None;
        }
        let _pass = PassGuard::acquire(&self.in_pass)?;

        let ratio = source.metrics().scroll_ratio();
        let dest = target.metrics();
        let top = ratio * (dest.scroll_height - dest.client_height);
        target.set_scroll_top(top);
        Some(target.metrics().scroll_top)
    }
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

/// Token for one synchronization pass; releases the guard when dropped.
struct PassGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> PassGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
