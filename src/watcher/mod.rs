//! Watching opened documents so the preview follows edits made on disk.
//!
//! Uses notify crate for cross-platform file system events. One OS watcher
//! covers every open tab; parent directories are watched non-recursively
//! because editors often save by replacing the file.
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, trace, warn};

use crate::session::TabId;

struct WatchedDocument {
    tab: TabId,
    path: PathBuf,
    root: PathBuf,
    name: Option<OsString>,
    pending_since: Option<Instant>,
}

impl WatchedDocument {
    fn is_relevant(&self, event: &Event) -> bool {
        event.paths.iter().any(|path| {
            path == &self.root
                || path == &self.path
                || self
                    .name
                    .as_ref()
                    .is_some_and(|name| path.file_name().is_some_and(|f| f == name))
        })
    }
}

/// Watches the files behind open tabs and reports debounced changes.
pub struct DocumentWatcher {
    watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    documents: Vec<WatchedDocument>,
    roots: HashSet<PathBuf>,
    debounce: Duration,
}

impl DocumentWatcher {
    /// Create a watcher with nothing registered yet.
    ///
    /// # Errors
    /// Returns an error if the platform watcher cannot be created.
    pub fn new(debounce: Duration) -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        Ok(Self {
            watcher,
            rx,
            documents: Vec::new(),
            roots: HashSet::new(),
            debounce,
        })
    }

    /// Start reporting changes to `path` as changes to `tab`.
    ///
    /// # Errors
    /// Returns an error if the file's directory cannot be watched.
    pub fn watch(&mut self, tab: TabId, path: impl AsRef<Path>) -> notify::Result<()> {
        // Event paths from the OS are absolute and canonical.
        let path = path
            .as_ref()
            .canonicalize()
            .unwrap_or_else(|_| path.as_ref().to_path_buf());
        let root = watch_root_for(&path);
        if !self.roots.contains(&root) {
            self.watcher.watch(&root, RecursiveMode::NonRecursive)?;
            self.roots.insert(root.clone());
        }
        debug!(%tab, path = %path.display(), "watching document");
        self.documents.push(WatchedDocument {
            tab,
            name: path.file_name().map(std::ffi::OsStr::to_os_string),
            path,
            root,
            pending_since: None,
        });
        Ok(())
    }

    /// Stop reporting changes for `tab`.
    pub fn forget(&mut self, tab: TabId) {
        self.documents.retain(|doc| doc.tab != tab);
    }

    /// Tabs whose files changed and have been quiet for the debounce period.
    pub fn take_ready(&mut self) -> Vec<TabId> {
        let now = Instant::now();
        let mut total_events = 0u32;
        while let Ok(event) = self.rx.try_recv() {
            total_events += 1;
            match event {
                Ok(ev) => {
                    let mut relevant = false;
                    for doc in &mut self.documents {
                        if doc.is_relevant(&ev) {
                            doc.pending_since = Some(now);
                            relevant = true;
                        }
                    }
                    if !relevant {
                        trace!(kind = ?ev.kind, paths = ?ev.paths, "irrelevant watch event");
                    }
                }
                Err(err) => warn!(%err, "watch error"),
            }
        }
        if total_events > 0 {
            debug!(total = total_events, "watcher poll");
        }

        let mut ready = Vec::new();
        for doc in &mut self.documents {
            if doc
                .pending_since
                .is_some_and(|since| since.elapsed() >= self.debounce)
            {
                doc.pending_since = None;
                ready.push(doc.tab);
            }
        }
        ready
    }
}

fn watch_root_for(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
