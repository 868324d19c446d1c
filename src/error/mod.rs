//! Error types shared by the HTTP handlers

pub mod types;

pub use types::{RelayError, BAD_REQUEST_MESSAGE, UPSTREAM_FAILURE_MESSAGE};
