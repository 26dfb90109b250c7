//! Parley Test Harness - delivery scenarios and end-to-end validation
//!
//! This crate provides:
//! - Jittered, seeded delivery plans
//! - A harness that replays a plan over a loopback connection into a
//!   listener session and collects the results

pub mod harness;
pub mod scenario;

pub use harness::*;
pub use scenario::*;
