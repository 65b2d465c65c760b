//! File system watcher for the command file's directory

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::application::errors::BotError;

/// Keeps the OS subscription alive. Dropping it unsubscribes.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Watch the directory holding `config_path`, non-recursively, forwarding
    /// changes to that file to `tx`. Other files in the directory never reach
    /// the queue.
    pub fn spawn(config_path: &Path, tx: mpsc::Sender<PathBuf>) -> Result<Self, BotError> {
        let dir = watch_dir(config_path);
        let file_name = config_path
            .file_name()
            .map(OsStr::to_os_string)
            .ok_or_else(|| BotError::Watch(format!("{} does not name a file", config_path.display())))?;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) if is_content_change(&event.kind) => {
                for path in event.paths {
                    if !is_config_file(&path, &file_name) {
                        continue;
                    }
                    // Every queued entry names the config file, so a full
                    // queue already has a reload pending.
                    let _ = tx.try_send(path);
                }
            }
            Ok(_) => {}
            Err(error) => tracing::warn!(%error, "File watcher error"),
        })
        .map_err(|e| BotError::Watch(format!("Failed to create watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| BotError::Watch(format!("Failed to watch {}: {}", dir.display(), e)))?;

        tracing::info!("Watching {} for command changes", dir.display());
        Ok(Self { _watcher: watcher })
    }
}

fn is_config_file(path: &Path, file_name: &OsStr) -> bool {
    path.file_name() == Some(file_name)
}

fn watch_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Data writes, creates and removes. Metadata and access events are noise.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_)
            | EventKind::Remove(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Any)
    )
}
