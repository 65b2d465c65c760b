//! File-based command table storage

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::errors::ConfigError;
use crate::domain::entities::CommandTable;
use crate::domain::traits::ConfigSource;

/// JSON command file (`commands.json`)
#[derive(Debug, Clone)]
pub struct JsonCommandFile {
    path: PathBuf,
}

impl JsonCommandFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    /// Rewrite the whole file with `table`.
    pub async fn write(&self, table: &CommandTable) -> Result<(), ConfigError> {
        let json = table.to_json()?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| ConfigError::from_io(&self.display(), e))
    }

    /// Create the file with an empty table unless it already exists.
    /// Returns whether a file was written.
    pub async fn init(&self) -> Result<bool, ConfigError> {
        if tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| ConfigError::from_io(&self.display(), e))?
        {
            return Ok(false);
        }
        self.write(&CommandTable::new()).await?;
        Ok(true)
    }
}

#[async_trait]
impl ConfigSource for JsonCommandFile {
    async fn read_raw(&self) -> Result<String, ConfigError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::from_io(&self.display(), e))
    }

    fn describe(&self) -> String {
        self.display()
    }
}
