use std::ops::Range;

use tracing::debug;

use crate::app::Model;
use crate::editor::FormatAction;
use crate::files::is_markdown_name;
use crate::session::TabId;
use crate::sync::{Pane, ScrollPane};

/// All possible events and actions in the editor.
///
/// These represent user input from the tab bar, the editing surface, the
/// search bar and the two scrollable panes.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Tabs
    /// Open a new empty tab
    NewTab,
    /// A file was picked; opens as a tab when its name ends in `.md`
    OpenFile { name: String, content: String },
    /// Activate a tab
    SwitchTab(TabId),
    /// Close a tab (ignored for the last one)
    CloseTab(TabId),

    // Editing
    /// The editing surface now holds this text
    Input(String),
    /// Type text over the current selection
    InsertText(String),
    /// Move the selection on the editing surface
    Select(Range<usize>),
    /// Apply a toolbar formatting action
    Format(FormatAction),

    // Search
    /// Show the search bar
    StartSearch,
    /// Update search query
    SearchInput(String),
    /// Flip case sensitivity and search again
    ToggleCaseSensitive,
    /// Go to next search match
    NextMatch,
    /// Go to previous match
    PrevMatch,
    /// Replace the current match
    ReplaceCurrent(String),
    /// Replace every match
    ReplaceAll(String),
    /// Hide the search bar and drop the matches
    CloseSearch,

    // Scrolling
    /// A pane was scrolled to this offset
    Scrolled(Pane, f64),
    /// A pane's content or viewport height changed
    PaneResized {
        pane: Pane,
        scroll_height: f64,
        client_height: f64,
    },
    /// Turn scroll coupling on or off
    ToggleScrollSync,
}

/// Pure function that updates the model based on a message.
///
/// Requests that do not apply (unknown tabs, closing the last tab, stepping
/// with no matches) leave the model unchanged.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::NewTab => {
            model.session.create_tab(None, None);
            on_tab_changed(&mut model);
        }
        Message::OpenFile { name, content } => {
            if is_markdown_name(&name) {
                model.session.create_tab(Some(&name), Some(&content));
                on_tab_changed(&mut model);
            } else {
                debug!(%name, "ignoring non-markdown file");
            }
        }
        Message::SwitchTab(id) => {
            if model.session.switch_tab(id).is_applied() {
                on_tab_changed(&mut model);
            }
        }
        Message::CloseTab(id) => {
            if model.session.close_tab(id).is_applied() {
                on_tab_changed(&mut model);
            }
        }

        Message::Input(text) => {
            model.session.surface_mut().set_text(&text);
            on_text_edited(&mut model);
        }
        Message::InsertText(text) => {
            model.session.surface_mut().insert_str(&text);
            on_text_edited(&mut model);
        }
        Message::Select(range) => {
            model.session.surface_mut().select(range);
        }
        Message::Format(action) => {
            action.apply(model.session.surface_mut());
            on_text_edited(&mut model);
        }

        Message::StartSearch => {
            model.search_visible = true;
        }
        Message::SearchInput(query) => {
            let text = model.session.surface().text();
            let case_sensitive = model.search.case_sensitive();
            model.search.set_query(&text, &query, case_sensitive);
            model.highlight_current_match();
        }
        Message::ToggleCaseSensitive => {
            let text = model.session.surface().text();
            model.search.toggle_case_sensitive(&text);
            model.highlight_current_match();
        }
        Message::NextMatch => {
            if model.search.next_match().is_applied() {
                model.highlight_current_match();
            }
        }
        Message::PrevMatch => {
            if model.search.previous_match().is_applied() {
                model.highlight_current_match();
            }
        }
        Message::ReplaceCurrent(replacement) => {
            if model
                .search
                .replace_current(model.session.surface_mut(), &replacement)
                .is_applied()
            {
                model.highlight_current_match();
                model.refresh_preview();
            }
        }
        Message::ReplaceAll(replacement) => {
            if model
                .search
                .replace_all(model.session.surface_mut(), &replacement)
                .is_applied()
            {
                model.highlight_current_match();
                model.refresh_preview();
            }
        }
        Message::CloseSearch => {
            model.search_visible = false;
            model.search.clear();
            model.session.surface_mut().collapse_selection();
        }

        Message::Scrolled(pane, scroll_top) => {
            model.pane_mut(pane).set_scroll_top(scroll_top);
            model.sync_scroll_from(pane);
        }
        Message::PaneResized {
            pane,
            scroll_height,
            client_height,
        } => {
            let metrics = model.pane_mut(pane);
            metrics.scroll_height = scroll_height;
            metrics.client_height = client_height;
            let top = metrics.scroll_top;
            metrics.set_scroll_top(top);
            model.sync_scroll_from(pane);
        }
        Message::ToggleScrollSync => {
            let enabled = model.scroll_sync.toggle();
            debug!(enabled, "scroll sync toggled");
        }
    }

    model
}

/// A different document is on the surface: search it from the top and
/// re-render.
fn on_tab_changed(model: &mut Model) {
    if !model.search.query().is_empty() {
        let text = model.session.surface().text();
        let query = model.search.query().to_string();
        let case_sensitive = model.search.case_sensitive();
        model.search.set_query(&text, &query, case_sensitive);
        model.highlight_current_match();
    }
    model.refresh_preview();
}

/// The same document changed: keep the search position where possible.
fn on_text_edited(model: &mut Model) {
    if !model.search.query().is_empty() {
        let text = model.session.surface().text();
        model.search.refresh(&text);
    }
    model.refresh_preview();
}
