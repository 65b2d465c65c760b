//! Command table store with change detection and bounded-retry reloads

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::application::errors::{ConfigError, ReloadError};
use crate::domain::entities::{CommandTable, CooldownState};
use crate::domain::traits::ConfigSource;

/// Bounded retry: at most `max_attempts` reads, `delay` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// What a successful reload did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Raw content identical to the last applied content
    Unchanged,
    Applied(ReloadSummary),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub kept: usize,
    pub pruned_cooldowns: usize,
    pub attempts: u32,
}

/// The table and cooldowns, always swapped and reconciled together
#[derive(Debug, Default)]
struct EngineState {
    table: Arc<CommandTable>,
    cooldowns: CooldownState,
    last_raw: Option<String>,
}

impl EngineState {
    fn apply(&mut self, table: CommandTable, raw: String, attempts: u32) -> ReloadSummary {
        let added: Vec<String> = table
            .keys()
            .filter(|k| !self.table.contains_key(k))
            .map(String::from)
            .collect();
        let removed: Vec<String> = self
            .table
            .keys()
            .filter(|k| !table.contains_key(k))
            .map(String::from)
            .collect();
        let kept = table.len() - added.len();
        let pruned_cooldowns = self.cooldowns.reconcile(&table);

        self.table = Arc::new(table);
        self.last_raw = Some(raw);

        ReloadSummary {
            added,
            removed,
            kept,
            pruned_cooldowns,
            attempts,
        }
    }
}

/// Owns the authoritative command table
pub struct ConfigStore {
    source: Arc<dyn ConfigSource>,
    policy: RetryPolicy,
    state: Mutex<EngineState>,
    // Serializes whole reloads so two callers never interleave attempts.
    reloading: tokio::sync::Mutex<()>,
}

impl ConfigStore {
    /// Read and parse the table once, without retries.
    pub async fn load(source: &dyn ConfigSource) -> Result<CommandTable, ConfigError> {
        let raw = source.read_raw().await?;
        CommandTable::from_json(&raw)
    }

    /// Empty store; nothing is read until the first reload.
    pub fn new(source: Arc<dyn ConfigSource>, policy: RetryPolicy) -> Self {
        Self {
            source,
            policy,
            state: Mutex::new(EngineState::default()),
            reloading: tokio::sync::Mutex::new(()),
        }
    }

    /// Create the store and perform the startup load.
    ///
    /// A source that is still unusable after the retry budget leaves the
    /// table empty; a later reload picks the file up.
    pub async fn open(source: Arc<dyn ConfigSource>, policy: RetryPolicy) -> Self {
        let store = Self::new(source, policy);
        if let Err(e) = store.reload().await {
            tracing::warn!("Starting with an empty command table: {}", e);
        }
        store
    }

    /// Re-read the source and swap in the new table if its text changed.
    ///
    /// Every attempt re-reads the source, so a file that is mid-write on the
    /// first attempt is picked up once the writer finishes. When every
    /// attempt fails the current table is left as it was.
    pub async fn reload(&self) -> Result<ReloadOutcome, ReloadError> {
        let _guard = self.reloading.lock().await;
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.try_reload(attempt).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        "Failed to reload {}: {}. Retrying...",
                        self.source.describe(),
                        e
                    );
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to reload {} after {} attempt(s), keeping previous commands: {}",
                        self.source.describe(),
                        attempt,
                        e
                    );
                    return Err(ReloadError {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }

    async fn try_reload(&self, attempt: u32) -> Result<ReloadOutcome, ConfigError> {
        let raw = self.source.read_raw().await?;

        if self.lock_state().last_raw.as_deref() == Some(raw.as_str()) {
            tracing::debug!("{} unchanged, skipping reload", self.source.describe());
            return Ok(ReloadOutcome::Unchanged);
        }

        let table = CommandTable::from_json(&raw)?;
        let summary = self.lock_state().apply(table, raw, attempt);

        tracing::info!(
            added = summary.added.len(),
            removed = summary.removed.len(),
            kept = summary.kept,
            "Commands reloaded from {}",
            self.source.describe()
        );
        Ok(ReloadOutcome::Applied(summary))
    }

    /// Current table snapshot
    pub fn table(&self) -> Arc<CommandTable> {
        Arc::clone(&self.lock_state().table)
    }

    /// Copy of the cooldown state
    pub fn cooldowns(&self) -> CooldownState {
        self.lock_state().cooldowns.clone()
    }

    pub fn last_fired(&self, key: &str) -> Option<Duration> {
        self.lock_state().cooldowns.last_fired(key)
    }

    /// Run `f` against the table and cooldowns under a single lock.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&CommandTable, &mut CooldownState) -> R) -> R {
        let mut guard = self.lock_state();
        let state = &mut *guard;
        f(&state.table, &mut state.cooldowns)
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
