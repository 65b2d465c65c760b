use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::errors::ConfigError;

/// Splits a command key into its trigger variations.
///
/// Variations are comma separated, trimmed and lowercased. Empty pieces are
/// dropped and repeated variations are kept once, in first-seen order.
pub fn variations(key: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for piece in key.split(',') {
        let variation = piece.trim().to_lowercase();
        if !variation.is_empty() && !found.contains(&variation) {
            found.push(variation);
        }
    }
    found
}

/// A single trigger -> response rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    triggers: Vec<String>,
    pub response: String,
    pub cooldown_secs: u64,
}

impl CommandEntry {
    /// Builds an entry for `key`. Fails when the key holds no usable variation.
    pub fn new(key: &str, response: impl Into<String>, cooldown_secs: u64) -> Result<Self, ConfigError> {
        let triggers = variations(key);
        if triggers.is_empty() {
            return Err(ConfigError::Malformed(format!(
                "command key {:?} has no trigger variations",
                key
            )));
        }

        Ok(Self {
            triggers,
            response: response.into(),
            cooldown_secs,
        })
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// `message` must already be lowercased.
    pub fn matches(&self, message: &str) -> bool {
        self.triggers.iter().any(|t| message.contains(t.as_str()))
    }
}

/// On-disk shape of a single entry
#[derive(Debug, Deserialize, Serialize)]
struct StoredEntry {
    response: String,
    #[serde(default)]
    cooldown: u64,
}

/// Ordered command table keyed by the raw, comma-joined trigger string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    entries: Vec<(String, CommandEntry)>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a command. A replaced key keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        response: impl Into<String>,
        cooldown_secs: u64,
    ) -> Result<Option<CommandEntry>, ConfigError> {
        let key = key.into();
        let entry = CommandEntry::new(&key, response, cooldown_secs)?;

        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Ok(Some(std::mem::replace(&mut slot.1, entry)));
        }
        self.entries.push((key, entry));
        Ok(None)
    }

    pub fn remove(&mut self, key: &str) -> Option<CommandEntry> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, key: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in authored order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the persisted JSON representation.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)
            .map_err(|e| ConfigError::Malformed(format!("Failed to parse commands: {}", e)))?;

        let mut table = Self::new();
        for (key, value) in map {
            let stored: StoredEntry = serde_json::from_value(value)
                .map_err(|e| ConfigError::Malformed(format!("Invalid command {:?}: {}", key, e)))?;
            if variations(&key).is_empty() {
                tracing::warn!(key = ?key, "Command key has no trigger variations, file not applied");
            }
            table.insert(key, stored.response, stored.cooldown)?;
        }
        Ok(table)
    }

    /// Serialize to the persisted representation, pretty printed with four
    /// space indentation.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let mut map = serde_json::Map::new();
        for (key, entry) in &self.entries {
            let stored = StoredEntry {
                response: entry.response.clone(),
                cooldown: entry.cooldown_secs,
            };
            let value = serde_json::to_value(stored)
                .map_err(|e| ConfigError::Malformed(e.to_string()))?;
            map.insert(key.clone(), value);
        }

        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        map.serialize(&mut serializer)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;

        String::from_utf8(out).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}
