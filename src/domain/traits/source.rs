use async_trait::async_trait;
use crate::application::errors::ConfigError;

/// Where the persisted command table lives
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Read the raw, unparsed content
    async fn read_raw(&self) -> Result<String, ConfigError>;

    /// Human readable location, for logs
    fn describe(&self) -> String;
}
