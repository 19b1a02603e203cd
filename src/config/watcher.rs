//! Route table watcher for hot reload.
//!
//! # Responsibilities
//! - Notice edits to the route table file, however the editor saves it
//! - Load and validate the new table
//! - Forward only valid, changed tables to the reload task
//!
//! # Design Decisions
//! - Watches the parent directory, not the file: an atomic save (write a temp
//!   file, rename it over the table) replaces the inode and would silently end
//!   a file-level watch
//! - Events are filtered on the table's file name
//! - An empty file is treated as a save in progress and skipped
//! - Unchanged contents are not re-sent, so one save yields one reload

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::{AccessKind, AccessMode, EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::RouterConfig;

/// Watches a route table file and emits validated updates.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for validated route tables.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching in a background thread.
    ///
    /// The returned handle must be kept alive for as long as updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| notify::Error::generic("route table path has no file name"))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut reloader = Reloader {
            path: self.path.clone(),
            file_name,
            last: fs::read_to_string(&self.path).ok(),
            tx: self.update_tx,
        };

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => reloader.handle(&event),
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, dir = ?dir, "Config watcher started");
        Ok(watcher)
    }
}

/// State owned by the notify callback.
struct Reloader {
    path: PathBuf,
    file_name: OsString,
    last: Option<String>,
    tx: mpsc::UnboundedSender<RouterConfig>,
}

impl Reloader {
    fn handle(&mut self, event: &Event) {
        if !is_content_event(&event.kind) || !self.concerns_table(event) {
            return;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                // Between unlink and rename during an atomic save.
                tracing::debug!(error = %e, "Route table not readable yet");
                return;
            }
        };
        if content.trim().is_empty() {
            tracing::debug!("Route table empty, waiting for write to finish");
            return;
        }
        if self.last.as_deref() == Some(content.as_str()) {
            return;
        }

        tracing::info!(path = ?self.path, "Config file change detected, reloading...");
        match parse_config(&content) {
            Ok(config) => {
                self.last = Some(content);
                let _ = self.tx.send(config);
            }
            Err(e) => {
                tracing::error!("Failed to reload config: {}. Keeping current routes.", e);
            }
        }
    }

    fn concerns_table(&self, event: &Event) -> bool {
        event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
    }
}

fn is_content_event(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RenameMode};

    #[test]
    fn test_content_event_kinds() {
        assert!(is_content_event(&EventKind::Create(CreateKind::File)));
        assert!(is_content_event(&EventKind::Modify(ModifyKind::Data(DataChange::Any))));
        assert!(is_content_event(&EventKind::Modify(ModifyKind::Name(RenameMode::To))));
        assert!(!is_content_event(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Any
        ))));
        assert!(is_content_event(&EventKind::Access(AccessKind::Close(AccessMode::Write))));
        assert!(!is_content_event(&EventKind::Access(AccessKind::Read)));
        assert!(!is_content_event(&EventKind::Remove(notify::event::RemoveKind::File)));
    }

    #[test]
    fn test_events_filtered_on_file_name() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let reloader = Reloader {
            path: PathBuf::from("/etc/router/routes.toml"),
            file_name: OsString::from("routes.toml"),
            last: None,
            tx,
        };

        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/etc/router/routes.swp"));
        assert!(!reloader.concerns_table(&other));

        let rename = Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/etc/router/routes.swp"))
            .add_path(PathBuf::from("/etc/router/routes.toml"));
        assert!(reloader.concerns_table(&rename));
    }
}
