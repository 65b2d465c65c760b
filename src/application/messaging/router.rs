//! Message router - Matches messages against the command table

use std::sync::Arc;
use std::time::Duration;

use crate::application::services::ConfigStore;
use crate::domain::entities::ChatMessage;
use crate::domain::traits::{ChatTransport, Clock};

/// A command that fired for a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub key: String,
    pub response: String,
}

/// Routes inbound messages to command responses.
///
/// Every command whose variation appears in the message fires, in table
/// order. Overlapping triggers are not resolved against each other.
pub struct MessageRouter {
    store: Arc<ConfigStore>,
    clock: Arc<dyn Clock>,
}

impl MessageRouter {
    pub fn new(store: Arc<ConfigStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Match `text` at the clock's current time
    pub fn route(&self, text: &str) -> Vec<Dispatch> {
        self.route_at(text, self.clock.now())
    }

    /// Match `text` at `now`, recording the fire time of every dispatched command.
    pub fn route_at(&self, text: &str, now: Duration) -> Vec<Dispatch> {
        let message = text.to_lowercase();

        self.store.with_state(|table, cooldowns| {
            let mut fired = Vec::new();
            for (key, entry) in table.iter() {
                if entry.matches(&message) && cooldowns.can_fire(key, entry.cooldown(), now) {
                    cooldowns.record(key, now);
                    fired.push(Dispatch {
                        key: key.to_string(),
                        response: entry.response.clone(),
                    });
                }
            }
            fired
        })
    }

    /// Route a message and send every response. Returns the number of
    /// commands that fired.
    pub async fn handle(&self, message: &ChatMessage, transport: &dyn ChatTransport) -> usize {
        let fired = self.route(&message.text);

        for dispatch in &fired {
            tracing::info!(
                message_id = %message.id,
                sender = message.sender_name(),
                platform = %message.platform,
                queued_ms = message.age().num_milliseconds(),
                "[{}] {:?} fired",
                message.channel,
                dispatch.key
            );
            // The cooldown stays recorded even if the send fails.
            if let Err(e) = transport.send(&dispatch.response).await {
                tracing::error!("Failed to send response for {:?}: {}", dispatch.key, e);
            }
        }

        if fired.is_empty() {
            tracing::debug!("[{}] no command matched: {}", message.channel, message.preview());
        }
        fired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::ConfigError;
    use crate::application::services::RetryPolicy;
    use crate::domain::traits::{ConfigSource, ManualClock};
    use async_trait::async_trait;

    struct StaticSource(&'static str);

    #[async_trait]
    impl ConfigSource for StaticSource {
        async fn read_raw(&self) -> Result<String, ConfigError> {
            Ok(self.0.to_string())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    async fn router(raw: &'static str) -> MessageRouter {
        let store = ConfigStore::open(Arc::new(StaticSource(raw)), RetryPolicy::default()).await;
        MessageRouter::new(Arc::new(store), Arc::new(ManualClock::new(Duration::from_secs(1))))
    }

    fn keys(fired: &[Dispatch]) -> Vec<&str> {
        fired.iter().map(|d| d.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_overlapping_triggers_all_fire() {
        let router = router(
            r#"{"hello": {"response": "hi", "cooldown": 0},
                "hello there": {"response": "HT", "cooldown": 0}}"#,
        )
        .await;

        let fired = router.route_at("hello there everyone", Duration::from_secs(10));
        assert_eq!(keys(&fired), vec!["hello", "hello there"]);
        assert_eq!(fired[1].response, "HT");
    }

    #[tokio::test]
    async fn test_match_is_case_insensitive() {
        let router = router(r#"{"Discord, DC": {"response": "link"}}"#).await;

        assert_eq!(router.route_at("WHERE IS THE dc?", Duration::from_secs(10)).len(), 1);
        assert!(router.route_at("nothing here", Duration::from_secs(20)).is_empty());
    }

    #[tokio::test]
    async fn test_any_variation_fires_once() {
        let router = router(r#"{"hi, hey": {"response": "yo"}}"#).await;

        let fired = router.route_at("hi and hey", Duration::from_secs(10));
        assert_eq!(fired.len(), 1);
    }

    #[tokio::test]
    async fn test_cooldown_blocks_until_strictly_elapsed() {
        let router = router(r#"{"!dice": {"response": "4", "cooldown": 10}}"#).await;
        let t0 = Duration::from_secs(100);

        assert_eq!(router.route_at("!dice", t0).len(), 1);
        assert!(router.route_at("!dice", t0 + Duration::from_secs(5)).is_empty());
        assert!(router.route_at("!dice", t0 + Duration::from_secs(10)).is_empty());
        assert_eq!(router.route_at("!dice", t0 + Duration::from_secs(11)).len(), 1);
        assert_eq!(
            router.store().last_fired("!dice"),
            Some(t0 + Duration::from_secs(11))
        );
    }

    #[tokio::test]
    async fn test_blocked_command_does_not_update_timestamp() {
        let router = router(r#"{"!dice": {"response": "4", "cooldown": 10}}"#).await;

        router.route_at("!dice", Duration::from_secs(100));
        router.route_at("!dice", Duration::from_secs(105));
        assert_eq!(router.store().last_fired("!dice"), Some(Duration::from_secs(100)));
    }

    #[tokio::test]
    async fn test_uses_clock_when_not_given_time() {
        let router = router(r#"{"ping": {"response": "pong"}}"#).await;

        assert_eq!(router.route("ping").len(), 1);
        assert_eq!(router.store().last_fired("ping"), Some(Duration::from_secs(1)));
        // Same instant again: zero cooldown still needs time to pass.
        assert!(router.route("ping").is_empty());
    }
}
