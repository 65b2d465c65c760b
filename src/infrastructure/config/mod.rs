//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::SettingsError;
use crate::application::services::RetryPolicy;
use crate::engine::EngineSettings;

/// Bot configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub channel: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommandsConfig {
    pub path: PathBuf,
    pub debounce_ms: u64,
    pub reload: ReloadConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ReloadConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "trigger-bot".to_string(),
            channel: "general".to_string(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("commands.json"),
            debounce_ms: 1000,
            reload: ReloadConfig::default(),
        }
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot: BotConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| SettingsError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, SettingsError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| SettingsError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, SettingsError> {
        serde_yaml::to_string(self).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.commands.reload.max_attempts == 0 {
            return Err(SettingsError::InvalidValue(
                "commands.reload.max-attempts must be at least 1".to_string(),
            ));
        }
        if self.commands.path.file_name().is_none() {
            return Err(SettingsError::InvalidValue(format!(
                "commands.path {:?} does not name a file",
                self.commands.path
            )));
        }
        Ok(())
    }

    /// Environment variables override file values
    pub fn apply_env(&mut self) {
        if let Ok(channel) = std::env::var("BOT_CHANNEL") {
            self.bot.channel = channel;
        }

        if let Ok(path) = std::env::var("BOT_COMMANDS_FILE") {
            self.commands.path = PathBuf::from(path);
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            commands_path: self.commands.path.clone(),
            debounce: Duration::from_millis(self.commands.debounce_ms),
            retry: RetryPolicy {
                max_attempts: self.commands.reload.max_attempts,
                delay: Duration::from_millis(self.commands.reload.delay_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_reload_constants() {
        let settings = Config::default().engine_settings();

        assert_eq!(settings.commands_path, PathBuf::from("commands.json"));
        assert_eq!(settings.debounce, Duration::from_secs(1));
        assert_eq!(settings.retry, RetryPolicy::default());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml(
            "bot:\n  name: helper\n  channel: streamer\ncommands:\n  debounce-ms: 250\n",
        )
        .unwrap();

        assert_eq!(config.bot.channel, "streamer");
        assert_eq!(config.commands.debounce_ms, 250);
        assert_eq!(config.commands.reload.max_attempts, 3);
        assert_eq!(config.commands.path, PathBuf::from("commands.json"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = Config::from_yaml("commands:\n  reload:\n    max-attempts: 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();

        assert!(yaml.contains("debounce-ms: 1000"));
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_unknown_file_is_parse_error() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
