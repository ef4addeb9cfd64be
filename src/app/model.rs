use thiserror::Error;
use tracing::{error, warn};

use crate::files::Download;
use crate::render::{RenderBridge, RenderError};
use crate::search::{SearchEngine, SearchStatus};
use crate::session::{SessionManager, TabLabel};
use crate::stats::DocumentStats;
use crate::sync::{Pane, PaneMetrics, ScrollSync};

/// Raised when the editor cannot start at all.
///
/// The `Display` text is the banner shown in place of the editor.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(
        "Failed to load the required renderer ({renderer}): {source}. Editing and preview are disabled."
    )]
    RendererUnavailable {
        renderer: String,
        #[source]
        source: RenderError,
    },
}

/// The complete editor state.
///
/// All state lives here - no global or scattered state. One `Model` drives
/// one editing surface.
pub struct Model {
    /// Open tabs and the shared editing surface
    pub session: SessionManager,
    /// Find/replace state for the active tab
    pub search: SearchEngine,
    /// Whether the search bar is open
    pub search_visible: bool,
    /// Editor/preview scroll coupling
    pub scroll_sync: ScrollSync,
    /// Geometry of the raw-text pane
    pub editor_pane: PaneMetrics,
    /// Geometry of the rendered pane
    pub preview_pane: PaneMetrics,
    preview_html: String,
    stats: DocumentStats,
    renderer: Box<dyn RenderBridge>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("tabs", &self.session.len())
            .field("active", &self.session.active_id())
            .field("search_visible", &self.search_visible)
            .field("renderer", &self.renderer.name())
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Start an editor with one empty tab.
    ///
    /// # Errors
    /// Returns [`StartupError::RendererUnavailable`] when the renderer's probe
    /// fails; nothing is initialized in that case.
    pub fn new(renderer: Box<dyn RenderBridge>) -> Result<Self, StartupError> {
        if let Err(source) = renderer.probe() {
            error!(renderer = renderer.name(), %source, "renderer unavailable");
            return Err(StartupError::RendererUnavailable {
                renderer: renderer.name().to_string(),
                source,
            });
        }

        let mut session = SessionManager::new();
        session.create_tab(None, None);
        let mut model = Self {
            session,
            search: SearchEngine::new(),
            search_visible: false,
            scroll_sync: ScrollSync::new(),
            editor_pane: PaneMetrics::default(),
            preview_pane: PaneMetrics::default(),
            preview_html: String::new(),
            stats: DocumentStats::default(),
            renderer,
        };
        model.refresh_preview();
        Ok(model)
    }

    /// HTML currently shown in the preview pane.
    pub fn preview_html(&self) -> &str {
        &self.preview_html
    }

    /// Counts for the active tab's text.
    pub const fn stats(&self) -> DocumentStats {
        self.stats
    }

    pub fn tab_bar(&self) -> Vec<TabLabel> {
        self.session.tab_bar()
    }

    pub fn search_status(&self) -> SearchStatus {
        self.search.status()
    }

    /// Package the active tab for download.
    pub fn download(&self) -> Option<Download> {
        let tab = self.session.active_tab()?;
        Some(Download::for_tab(tab.name(), self.session.surface().text()))
    }

    pub const fn pane(&self, pane: Pane) -> &PaneMetrics {
        match pane {
            Pane::Editor => &self.editor_pane,
            Pane::Preview => &self.preview_pane,
        }
    }

    pub(super) const fn pane_mut(&mut self, pane: Pane) -> &mut PaneMetrics {
        match pane {
            Pane::Editor => &mut self.editor_pane,
            Pane::Preview => &mut self.preview_pane,
        }
    }

    /// Re-render the preview and counters from the editing surface.
    ///
    /// A failed render keeps the previous preview.
    pub(super) fn refresh_preview(&mut self) {
        let text = self.session.surface().text();
        self.stats = DocumentStats::from_text(&text);
        match self.renderer.render(&text) {
            Ok(html) => self.preview_html = html,
            Err(err) => warn!(%err, "preview render failed; keeping previous preview"),
        }
    }

    /// Select the current search match on the editing surface.
    pub(super) fn highlight_current_match(&mut self) {
        if let Some(span) = self.search.current_match() {
            self.session.surface_mut().select(span.range());
        }
    }

    /// Copy the scroll depth of `source` onto the other pane.
    pub(super) fn sync_scroll_from(&mut self, source: Pane) -> Option<f64> {
        match source {
            Pane::Editor => self.scroll_sync.sync(&self.editor_pane, &mut self.preview_pane),
            Pane::Preview => self.scroll_sync.sync(&self.preview_pane, &mut self.editor_pane),
        }
    }
}
