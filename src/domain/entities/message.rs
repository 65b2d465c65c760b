use chrono::{DateTime, Utc};

/// An inbound chat message for the watched channel
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub channel: String,
    pub sender: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub platform: String,
}

impl ChatMessage {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            channel: channel.into(),
            sender: None,
            text: text.into(),
            timestamp: Utc::now(),
            platform: "unknown".to_string(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Short preview for logs
    pub fn preview(&self) -> String {
        self.text.chars().take(50).collect()
    }

    pub fn sender_name(&self) -> &str {
        self.sender.as_deref().unwrap_or("unknown")
    }

    /// Time spent between receipt and now, clamped at zero
    pub fn age(&self) -> chrono::Duration {
        (Utc::now() - self.timestamp).max(chrono::Duration::zero())
    }
}
