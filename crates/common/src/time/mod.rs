//! Time abstractions
//!
//! - **Clock abstractions**: real and mock wall clocks

pub mod clock;

pub use clock::{Clock, MockClock, SystemClock};
