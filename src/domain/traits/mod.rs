//! Domain traits - Abstractions for infrastructure implementations

pub mod clock;
pub mod source;
pub mod transport;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use source::ConfigSource;
pub use transport::{ChatTransport, TransportInfo};
