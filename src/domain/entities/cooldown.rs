use std::collections::HashMap;
use std::time::Duration;

use super::CommandTable;

/// Last-fired time per command key.
///
/// Times are offsets on the engine clock. A key with no entry has never fired
/// and is always eligible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownState {
    last_fired: HashMap<String, Duration>,
}

impl CooldownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_fired(&self, key: &str) -> Option<Duration> {
        self.last_fired.get(key).copied()
    }

    /// Strictly more than `cooldown` must have elapsed since the last fire.
    pub fn can_fire(&self, key: &str, cooldown: Duration, now: Duration) -> bool {
        match self.last_fired.get(key) {
            Some(&last) => now.saturating_sub(last) > cooldown,
            None => true,
        }
    }

    pub fn record(&mut self, key: &str, now: Duration) {
        self.last_fired.insert(key.to_string(), now);
    }

    /// Drop entries whose key is gone from `table`. Returns how many were pruned.
    pub fn reconcile(&mut self, table: &CommandTable) -> usize {
        let before = self.last_fired.len();
        self.last_fired.retain(|key, _| table.contains_key(key));
        before - self.last_fired.len()
    }

    pub fn len(&self) -> usize {
        self.last_fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_fired.is_empty()
    }
}
