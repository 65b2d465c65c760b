//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Services: Command table store and debounced reloads
//! - Errors: Domain-specific errors
//! - Messaging: Matching messages to command responses

pub mod errors;
pub mod services;
pub mod messaging;
