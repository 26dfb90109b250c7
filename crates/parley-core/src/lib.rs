//! Parley Core - Fundamental types and primitives
//!
//! This crate defines the types shared by the listener pipeline:
//! - Identifiers (EntryId)
//! - Message model (RawMessage, separators, sentinel)
//! - Grammar validation
//! - Token decoding with a memoizing cache
//! - Acknowledgement capability

pub mod ack;
pub mod decoder;
pub mod error;
pub mod grammar;
pub mod id;
pub mod message;

pub use ack::*;
pub use decoder::*;
pub use error::*;
pub use grammar::*;
pub use id::*;
pub use message::*;
