//! Editor state and the command-line driver.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete editor state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Opens files as tabs, applies find/replace, writes previews

mod effects;
mod event_loop;
mod model;
mod update;

pub use effects::TabReport;
pub use model::{Model, StartupError};
pub use update::{Message, update};

use std::path::PathBuf;

use anyhow::Result;
use tracing::{info, warn};

use crate::files::load_markdown;
use crate::render::MarkdownRenderer;
use crate::session::TabId;

/// A tab that was opened from a file on disk.
#[derive(Debug, Clone)]
struct OpenedFile {
    tab: TabId,
    path: PathBuf,
}

/// Drives a [`Model`] from command-line options.
#[derive(Debug, Clone, Default)]
pub struct App {
    files: Vec<PathBuf>,
    find: Option<String>,
    replace: Option<String>,
    case_sensitive: bool,
    highlight: bool,
    json: bool,
    out_dir: Option<PathBuf>,
    watch_enabled: bool,
}

impl App {
    /// Create an application for the given files.
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            highlight: true,
            ..Self::default()
        }
    }

    /// Search each document for `query`.
    pub fn with_find(mut self, query: Option<String>) -> Self {
        self.find = query;
        self
    }

    /// Replace every match of the find query with `replacement`.
    pub fn with_replace(mut self, replacement: Option<String>) -> Self {
        self.replace = replacement;
        self
    }

    pub const fn with_case_sensitive(mut self, enabled: bool) -> Self {
        self.case_sensitive = enabled;
        self
    }

    /// Enable or disable syntax highlighting in previews.
    pub const fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Print the report as JSON instead of text.
    pub const fn with_json(mut self, enabled: bool) -> Self {
        self.json = enabled;
        self
    }

    /// Directory that receives previews and edited documents.
    pub fn with_out_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.out_dir = dir;
        self
    }

    /// Enable or disable file watching.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Open every file, process each tab and print the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the renderer is unavailable, an accepted file
    /// cannot be read, or an output cannot be written.
    pub fn run(&self) -> Result<()> {
        let renderer = MarkdownRenderer::new().with_highlighting(self.highlight);
        let mut model = Model::new(Box::new(renderer))?;
        let placeholder = model.session.active_id();

        let mut opened = Vec::with_capacity(self.files.len());
        for path in &self.files {
            let Some(file) = load_markdown(path)? else {
                continue;
            };
            model = update(
                model,
                Message::OpenFile {
                    name: file.name,
                    content: file.content,
                },
            );
            if let Some(tab) = model.session.active_id() {
                opened.push(OpenedFile {
                    tab,
                    path: path.clone(),
                });
            }
        }
        if opened.is_empty() {
            warn!("no .md files to open");
            return Ok(());
        }
        if let Some(id) = placeholder {
            model = update(model, Message::CloseTab(id));
        }
        info!(tabs = model.session.len(), "documents opened");

        let mut reports = Vec::with_capacity(opened.len());
        for doc in &opened {
            let (next, report) = self.process_tab(model, doc)?;
            model = next;
            reports.push(report);
        }
        self.print_reports(&reports)?;

        if self.watch_enabled {
            self.watch_loop(model, &opened)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
