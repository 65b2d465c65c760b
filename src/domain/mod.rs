//! Domain layer - Core business logic
//!
//! This layer contains:
//! - Entities: Command table, cooldown state, chat messages
//! - Traits: Abstractions for infrastructure (ChatTransport, ConfigSource, Clock)

pub mod entities;
pub mod traits;
