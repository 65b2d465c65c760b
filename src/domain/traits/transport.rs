use async_trait::async_trait;
use crate::application::errors::BotError;

/// Chat transport - abstraction for the channel connection.
///
/// Connection, authentication and reconnects belong to the implementation.
/// Inbound messages are delivered separately over a channel.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Publish a message to the channel
    async fn send(&self, text: &str) -> Result<(), BotError>;

    /// Transport info
    fn info(&self) -> TransportInfo;
}

/// Transport information
#[derive(Debug, Clone)]
pub struct TransportInfo {
    pub name: String,
    pub channel: String,
}
