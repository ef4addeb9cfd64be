//! Multi-tab document session.
//!
//! The [`SessionManager`] owns the ordered list of open tabs and the one
//! shared [`EditorBuffer`]. Only the active tab's text lives in the buffer;
//! every other tab keeps a cold snapshot in [`Tab::content`] until it is
//! switched back in.

use std::fmt;

use tracing::debug;

use crate::editor::EditorBuffer;
use crate::transition::Transition;

/// Name given to tabs that were not created from a file.
pub const DEFAULT_TAB_NAME: &str = "Untitled";

/// Unique tab identifier. Ids increase monotonically and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(u64);

impl TabId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    id: TabId,
    name: String,
    /// Snapshot of the text. Stale while the tab is active; the live copy is
    /// in the session's editing surface.
    content: String,
}

impl Tab {
    pub const fn id(&self) -> TabId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this tab still carries the placeholder name.
    pub fn is_untitled(&self) -> bool {
        self.name == DEFAULT_TAB_NAME
    }
}

/// Presentation data for one entry of the tab bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    pub id: TabId,
    pub name: String,
    pub active: bool,
    /// Close affordance; only offered while more than one tab is open.
    pub closable: bool,
}

/// Owns the open tabs and mediates which one is loaded into the editor.
#[derive(Debug)]
pub struct SessionManager {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
    surface: EditorBuffer,
}

impl SessionManager {
    /// Create a session with no tabs and an empty editing surface.
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
            surface: EditorBuffer::empty(),
        }
    }

    fn next_tab_id(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Open a new tab and make it active.
    ///
    /// `name` defaults to [`DEFAULT_TAB_NAME`] and `content` to empty text.
    pub fn create_tab(&mut self, name: Option<&str>, content: Option<&str>) -> &Tab {
        let id = self.next_tab_id();
        self.tabs.push(Tab {
            id,
            name: name.unwrap_or(DEFAULT_TAB_NAME).to_string(),
            content: content.unwrap_or_default().to_string(),
        });
        debug!(tab = %id, count = self.tabs.len(), "tab created");
        let _ = self.switch_tab(id);
        &self.tabs[self.tabs.len() - 1]
    }

    /// Make `id` the active tab.
    ///
    /// The outgoing tab's text is flushed from the editing surface into its
    /// snapshot before the incoming tab's snapshot is loaded. Switching to the
    /// already-active tab changes nothing but still reports `Applied` so the
    /// caller re-renders. Unknown ids are ignored.
    pub fn switch_tab(&mut self, id: TabId) -> Transition {
        if self.active == Some(id) {
            return Transition::Applied;
        }
        let Some(target) = self.index_of(id) else {
            debug!(tab = %id, "switch to unknown tab ignored");
            return Transition::Ignored;
        };
        self.flush_active();
        self.activate_index(target);
        Transition::Applied
    }

    /// Close tab `id`.
    ///
    /// The last remaining tab can never be closed. When the active tab is
    /// closed its unsaved surface text is discarded and the tab now at the
    /// same position (or the new last tab) takes its place.
    pub fn close_tab(&mut self, id: TabId) -> Transition {
        if self.tabs.len() <= 1 {
            debug!(tab = %id, "refusing to close the last tab");
            return Transition::Ignored;
        }
        let Some(index) = self.index_of(id) else {
            debug!(tab = %id, "close of unknown tab ignored");
            return Transition::Ignored;
        };
        self.tabs.remove(index);
        debug!(tab = %id, count = self.tabs.len(), "tab closed");

        if self.active == Some(id) {
            self.active = None;
            let next = index.min(self.tabs.len() - 1);
            self.activate_index(next);
        }
        Transition::Applied
    }

    /// Build the tab bar from scratch.
    pub fn tab_bar(&self) -> Vec<TabLabel> {
        let closable = self.tabs.len() > 1;
        self.tabs
            .iter()
            .map(|tab| TabLabel {
                id: tab.id,
                name: tab.name.clone(),
                active: self.active == Some(tab.id),
                closable,
            })
            .collect()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub const fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.tab(self.active?)
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    /// Current text of tab `id`: live surface text for the active tab, the
    /// stored snapshot for any other.
    pub fn content_of(&self, id: TabId) -> Option<String> {
        if self.active == Some(id) {
            return Some(self.surface.text());
        }
        self.tab(id).map(|t| t.content.clone())
    }

    /// The shared editing surface holding the active tab's text.
    pub const fn surface(&self) -> &EditorBuffer {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut EditorBuffer {
        &mut self.surface
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    fn flush_active(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let text = self.surface.text();
        if let Some(tab) = self.tabs.iter_mut().find(|t| t.id == active) {
            tab.content = text;
        }
    }

    fn activate_index(&mut self, index: usize) {
        let tab = &self.tabs[index];
        self.active = Some(tab.id);
        self.surface.load(&tab.content);
        debug!(tab = %tab.id, name = %tab.name, "tab activated");
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
