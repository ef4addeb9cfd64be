use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::{App, Message, Model, OpenedFile, update};
use crate::watcher::DocumentWatcher;

const DEBOUNCE: Duration = Duration::from_millis(200);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

impl App {
    /// Re-process documents whenever they change on disk. Runs until the
    /// process is interrupted.
    pub(super) fn watch_loop(&self, mut model: Model, opened: &[OpenedFile]) -> Result<()> {
        let mut watcher = DocumentWatcher::new(DEBOUNCE).context("Failed to start file watcher")?;
        for doc in opened {
            watcher
                .watch(doc.tab, &doc.path)
                .with_context(|| format!("Failed to watch {}", doc.path.display()))?;
        }
        info!(documents = opened.len(), "watching for changes");

        loop {
            for tab in watcher.take_ready() {
                let Some(doc) = opened.iter().find(|doc| doc.tab == tab) else {
                    continue;
                };
                let content = match std::fs::read_to_string(&doc.path) {
                    Ok(content) => content,
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                        warn!(path = %doc.path.display(), "document removed; no longer watching");
                        watcher.forget(tab);
                        continue;
                    }
                    Err(err) => {
                        warn!(path = %doc.path.display(), %err, "reload failed");
                        continue;
                    }
                };

                model = update(model, Message::SwitchTab(tab));
                model = update(model, Message::Input(content));
                let (next, report) = self.process_tab(model, doc)?;
                model = next;
                self.print_reports(std::slice::from_ref(&report))?;
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }
}
