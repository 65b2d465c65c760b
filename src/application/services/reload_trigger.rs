//! Debounced reload on command file change notifications

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::config_store::{ConfigStore, ReloadOutcome};

/// Turns "path modified" notifications into `ConfigStore::reload` calls
#[derive(Debug, Clone)]
pub struct ReloadTrigger {
    file_name: OsString,
    debounce: Duration,
}

impl ReloadTrigger {
    pub fn new(config_path: &Path, debounce: Duration) -> Self {
        Self {
            file_name: config_path
                .file_name()
                .map(OsString::from)
                .unwrap_or_default(),
            debounce,
        }
    }

    /// Notifications for other files in the directory are ignored.
    pub fn is_relevant(&self, path: &Path) -> bool {
        path.file_name() == Some(self.file_name.as_os_str())
    }

    /// Run the debounce loop until `events` closes.
    ///
    /// After a relevant notification the loop sleeps for the debounce delay,
    /// then drains whatever queued up meanwhile, so a burst of writes costs a
    /// single reload.
    pub fn spawn(self, store: Arc<ConfigStore>, mut events: mpsc::Receiver<PathBuf>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(path) = events.recv().await {
                if !self.is_relevant(&path) {
                    tracing::debug!("Ignoring change to {}", path.display());
                    continue;
                }

                tokio::time::sleep(self.debounce).await;
                let mut coalesced = 0usize;
                while let Ok(path) = events.try_recv() {
                    if self.is_relevant(&path) {
                        coalesced += 1;
                    }
                }
                tracing::debug!(coalesced, "Command file changed, reloading");

                match store.reload().await {
                    Ok(ReloadOutcome::Unchanged) => {}
                    Ok(ReloadOutcome::Applied(summary)) => {
                        if !summary.removed.is_empty() {
                            tracing::info!("Removed commands: {}", summary.removed.join(" | "));
                        }
                    }
                    // Already logged by the store; the previous table stays live.
                    Err(_) => {}
                }
            }
            tracing::debug!("Reload trigger stopped");
        })
    }
}
