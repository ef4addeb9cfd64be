//! Loading markdown files and naming downloads.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::session::DEFAULT_TAB_NAME;

/// Suffix a file name must end with to be opened.
pub const MARKDOWN_SUFFIX: &str = ".md";

/// MIME type of downloaded documents.
pub const MARKDOWN_MIME: &str = "text/markdown";

/// File name used when the active tab still has the placeholder name.
pub const FALLBACK_DOWNLOAD_NAME: &str = "document.md";

/// Whether a file called `name` may be loaded. The check is a literal,
/// case-sensitive suffix match.
pub fn is_markdown_name(name: &str) -> bool {
    name.ends_with(MARKDOWN_SUFFIX)
}

/// A document read from disk, ready to become a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub name: String,
    pub content: String,
}

/// Read `path` if its file name is accepted.
///
/// Rejected names yield `Ok(None)`; they are not an error.
///
/// # Errors
/// Returns an error if an accepted file cannot be read.
pub fn load_markdown(path: &Path) -> Result<Option<LoadedFile>> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_markdown_name(&name) {
        debug!(path = %path.display(), "ignoring non-markdown file");
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Some(LoadedFile { name, content }))
}

/// A document prepared for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime: &'static str,
    pub body: String,
}

impl Download {
    /// Package `body` under a name derived from the tab name.
    pub fn for_tab(tab_name: &str, body: String) -> Self {
        Self {
            file_name: download_name(tab_name),
            mime: MARKDOWN_MIME,
            body,
        }
    }

    /// Write the body into `dir` under [`Download::file_name`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_into(&self, dir: &Path) -> Result<std::path::PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.body)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Download file name for a tab called `tab_name`.
pub fn download_name(tab_name: &str) -> String {
    if tab_name == DEFAULT_TAB_NAME || tab_name.is_empty() {
        FALLBACK_DOWNLOAD_NAME.to_string()
    } else {
        tab_name.to_string()
    }
}
