//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Storage: The persisted command file
//! - Watcher: Filesystem change notifications
//! - Adapters: Platform integrations (console)

pub mod config;
pub mod storage;
pub mod watcher;
pub mod adapters;
