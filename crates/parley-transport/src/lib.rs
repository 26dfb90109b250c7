//! Parley Transport Layer - the connection as seen by the listener
//!
//! This crate provides:
//! - Connection lifecycle events
//! - Reconnect accounting (bounded attempts, fixed backoff)
//! - An in-process loopback connection that delivers messages with
//!   acknowledgement capabilities

pub mod events;
pub mod loopback;
pub mod reconnect;

pub use events::*;
pub use loopback::*;
pub use reconnect::*;
