//! trigger-bot - hot-reloadable trigger/response rules for a chat channel

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod engine;

pub use engine::{Engine, EngineSettings};
