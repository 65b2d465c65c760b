//! Domain entities - Core business objects

pub mod command;
pub mod cooldown;
pub mod message;

pub use command::{variations, CommandEntry, CommandTable};
pub use cooldown::CooldownState;
pub use message::ChatMessage;
