//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::application::errors::BotError;
use crate::domain::entities::ChatMessage;
use crate::domain::traits::{ChatTransport, TransportInfo};

/// Console transport: stdin lines in, stdout lines out
pub struct ConsoleAdapter {
    info: TransportInfo,
}

impl ConsoleAdapter {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            info: TransportInfo {
                name: "console".to_string(),
                channel: channel.into(),
            },
        }
    }

    /// Read stdin lines as inbound messages until EOF. The receiver closes
    /// once stdin does.
    pub fn spawn_reader(&self) -> mpsc::Receiver<ChatMessage> {
        let (tx, rx) = mpsc::channel(32);
        let channel = self.info.channel.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let message = ChatMessage::new(&channel, line)
                            .with_sender("console")
                            .with_platform("console");
                        if tx.send(message).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        });

        rx
    }
}

#[async_trait]
impl ChatTransport for ConsoleAdapter {
    async fn send(&self, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }

    fn info(&self) -> TransportInfo {
        self.info.clone()
    }
}
