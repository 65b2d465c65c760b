//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] SettingsError),

    #[error("Command table error: {0}")]
    Commands(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command table errors. All of them are worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Command file not found: {0}")]
    NotFound(String),

    #[error("Malformed command file: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl ConfigError {
    /// Classify an IO error raised while reading `path`
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.to_string()),
            std::io::ErrorKind::InvalidData => {
                ConfigError::Malformed(format!("{} is not valid UTF-8", path))
            }
            _ => ConfigError::Io(format!("{}: {}", path, err)),
        }
    }
}

/// Reload retry budget exhausted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Reload failed after {attempts} attempt(s): {source}")]
pub struct ReloadError {
    pub attempts: u32,
    pub source: ConfigError,
}

/// Application settings (config.yaml) errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
