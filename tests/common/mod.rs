//! Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use trigger_bot::application::errors::{BotError, ConfigError};
use trigger_bot::domain::traits::{ChatTransport, ConfigSource, TransportInfo};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Source that replays scripted reads, then repeats the last one
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<String, ConfigError>>>,
    last: Mutex<Result<String, ConfigError>>,
    reads: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(content: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(Ok(content.to_string())),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn missing() -> Self {
        let source = Self::new("");
        *source.last.lock().unwrap() = Err(ConfigError::NotFound("commands.json".to_string()));
        source
    }

    /// Replace the content every later read returns
    pub fn set(&self, content: &str) {
        self.script.lock().unwrap().clear();
        *self.last.lock().unwrap() = Ok(content.to_string());
    }

    /// Queue one-off reads ahead of the steady content
    pub fn then(&self, result: Result<String, ConfigError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigSource for ScriptedSource {
    async fn read_raw(&self) -> Result<String, ConfigError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => self.last.lock().unwrap().clone(),
        }
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Transport that records every send
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send(&self, text: &str) -> Result<(), BotError> {
        if self.fail {
            return Err(BotError::Transport("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn info(&self) -> TransportInfo {
        TransportInfo {
            name: "recording".to_string(),
            channel: "test".to_string(),
        }
    }
}
