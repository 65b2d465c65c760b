//! Application services - Command table ownership and reload orchestration

pub mod config_store;
pub mod reload_trigger;

pub use config_store::{ConfigStore, ReloadOutcome, ReloadSummary, RetryPolicy};
pub use reload_trigger::ReloadTrigger;
