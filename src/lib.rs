//! Chat relay library
//!
//! Shared pieces of the `chat-relay` and `restart-server` binaries.

// Public modules
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod schemas;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use config::{RelaySettings, RestartSettings};
pub use error::RelayError;
pub use server::{App, RestartableServer};
