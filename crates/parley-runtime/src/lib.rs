//! Parley Runtime - listener orchestration and processing loop
//!
//! Per message, the loop runs:
//! 1. Take the queue head
//! 2. Pace (mirror the sender's gap, capped)
//! 3. Classify (sentinel / invalid / sentence)
//! 4. Decode token by token, drawing a distraction before each
//! 5. Record the translation and acknowledge, or re-queue at the tail

pub mod config;
pub mod distraction;
pub mod listener;
pub mod queue;
pub mod recent;
pub mod session;
pub mod telemetry;

pub use config::*;
pub use distraction::*;
pub use listener::*;
pub use queue::*;
pub use recent::*;
pub use session::*;
pub use telemetry::*;
