//! Schema module
//!
//! Wire types for the relay and its upstream.

pub mod chat;
