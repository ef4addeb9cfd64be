use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::app::{App, Message, Model, OpenedFile, update};

/// What happened to one document during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabReport {
    pub tab: u64,
    pub name: String,
    pub words: usize,
    pub characters: usize,
    /// Matches for the find query, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<usize>,
    pub replaced: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<PathBuf>,
}

impl fmt::Display for TabReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} words, {} characters",
            self.name, self.words, self.characters
        )?;
        if let Some(matches) = self.matches {
            write!(f, "; {matches} matches")?;
            if self.replaced > 0 {
                write!(f, ", {} replaced", self.replaced)?;
            }
        }
        if let Some(path) = &self.preview {
            write!(f, " -> {}", path.display())?;
        }
        Ok(())
    }
}

impl App {
    /// Run find/replace on one tab and write its outputs.
    pub(super) fn process_tab(&self, model: Model, doc: &OpenedFile) -> Result<(Model, TabReport)> {
        let mut model = update(model, Message::SwitchTab(doc.tab));
        let mut matches = None;
        let mut replaced = 0;

        if let Some(query) = &self.find {
            model = update(model, Message::StartSearch);
            if model.search.case_sensitive() != self.case_sensitive {
                model = update(model, Message::ToggleCaseSensitive);
            }
            model = update(model, Message::SearchInput(query.clone()));
            let found = model.search.matches().len();
            matches = Some(found);
            if let Some(replacement) = &self.replace {
                model = update(model, Message::ReplaceAll(replacement.clone()));
                replaced = found;
            }
            model = update(model, Message::CloseSearch);
        }

        let (preview, download) = match &self.out_dir {
            Some(dir) => self.write_outputs(&model, dir, &doc.path, replaced > 0)?,
            None => (None, None),
        };

        let name = model
            .session
            .active_tab()
            .map(|tab| tab.name().to_string())
            .unwrap_or_default();
        let stats = model.stats();
        let report = TabReport {
            tab: doc.tab.get(),
            name,
            words: stats.words,
            characters: stats.characters,
            matches,
            replaced,
            preview,
            download,
        };
        Ok((model, report))
    }

    fn write_outputs(
        &self,
        model: &Model,
        dir: &Path,
        source: &Path,
        edited: bool,
    ) -> Result<(Option<PathBuf>, Option<PathBuf>)> {
        let Some(tab) = model.session.active_tab() else {
            return Ok((None, None));
        };
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let preview_path = dir.join(preview_file_name(tab.name()));
        fs::write(&preview_path, html_page(tab.name(), model.preview_html())?)
            .with_context(|| format!("Failed to write {}", preview_path.display()))?;
        debug!(path = %preview_path.display(), "preview written");

        let download_path = match model.download() {
            Some(download) if edited => {
                let target = dir.join(&download.file_name);
                if is_same_file(&target, source) {
                    warn!(
                        path = %target.display(),
                        "edited document would overwrite its source; skipped"
                    );
                    None
                } else {
                    Some(download.write_into(dir)?)
                }
            }
            _ => None,
        };
        Ok((Some(preview_path), download_path))
    }

    pub(super) fn print_reports(&self, reports: &[TabReport]) -> Result<()> {
        let mut out = std::io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut out, reports).context("Failed to write report")?;
            writeln!(out)?;
        } else {
            for report in reports {
                writeln!(out, "{report}")?;
            }
        }
        Ok(())
    }
}

/// `notes.md` previews as `notes.html`.
fn preview_file_name(tab_name: &str) -> String {
    let stem = Path::new(tab_name)
        .file_stem()
        .map_or_else(|| "document".into(), |s| s.to_string_lossy());
    format!("{stem}.html")
}

fn html_page(title: &str, body: &str) -> Result<String> {
    let mut escaped = Vec::with_capacity(title.len());
    comrak::html::escape(&mut escaped, title.as_bytes()).context("Failed to escape title")?;
    let title = String::from_utf8(escaped).context("Escaped title is not UTF-8")?;
    Ok(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    ))
}

/// Both paths exist and resolve to the same file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
