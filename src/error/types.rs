//! Relay error types
//!
//! Callers only ever see two generic failures. The underlying cause of an
//! upstream failure stays in the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::upstream::UpstreamError;

/// Body returned for a request that is not valid JSON
pub const BAD_REQUEST_MESSAGE: &str = "Invalid JSON request";

/// Body returned for any failure in the upstream call chain
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Error from GPT API";

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Upstream call failed: {0}")]
    UpstreamFailure(#[from] UpstreamError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text shown to the caller; never includes the cause
    pub fn public_message(&self) -> &'static str {
        match self {
            RelayError::BadRequest(_) => BAD_REQUEST_MESSAGE,
            RelayError::UpstreamFailure(_) => UPSTREAM_FAILURE_MESSAGE,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Plain text with a trailing newline, like a stock HTTP error page
        (self.status(), format!("{}\n", self.public_message())).into_response()
    }
}
