//! Parley Time - clocks and pacing
//!
//! This crate implements:
//! - A clock abstraction (system and manually driven clocks)
//! - The pacing controller, which mirrors the sender's inter-arrival gaps
//!   up to a ceiling

pub mod clock;
pub mod pacing;

pub use clock::*;
pub use pacing::*;
