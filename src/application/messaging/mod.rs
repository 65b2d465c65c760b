//! Message handling - Inbound message routing

pub mod router;

pub use router::{Dispatch, MessageRouter};
