//! Core data models
//!
//! Plain data produced by the parser and consumed by the generators,
//! separated from the logic that builds them.

mod inbound;

pub use inbound::*;
