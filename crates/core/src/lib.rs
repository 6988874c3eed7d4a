#![forbid(unsafe_code)]
//! Adaptive question delivery: value objects, feedback, difficulty
//! selection, scoring and the session state machine.

pub mod adaptive;
pub mod error;
pub mod feedback;
pub mod insights;
pub mod model;
pub mod pool;
pub mod scoring;
pub mod session;
pub mod time;

pub use error::Error;
pub use time::Clock;
