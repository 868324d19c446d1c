//! Services module
//!
//! External service integrations.

pub mod upstream;

pub use upstream::{CompletionClient, OpenAiClient, UpstreamConfig, UpstreamError};
