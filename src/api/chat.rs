//! Chat relay endpoint
//!
//! POST /chat decodes the caller's messages, forwards them to the upstream
//! completions API and returns the parsed reply.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::time::Instant;

use crate::error::{RelayError, UPSTREAM_FAILURE_MESSAGE};
use crate::schemas::chat::{ChatRequest, ChatResponse};
use crate::server::state::AppState;

/// JSON body terminated by a newline, as a streaming encoder writes it
pub struct JsonLine<T>(pub T);

impl<T: Serialize> IntoResponse for JsonLine<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(mut body) => {
                body.push(b'\n');
                (
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    )],
                    body,
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("{}\n", UPSTREAM_FAILURE_MESSAGE),
                )
                    .into_response()
            }
        }
    }
}

/// POST /chat - Relay a chat completion
///
/// The body is taken as raw bytes so that any malformed payload, whatever
/// its content type, ends up as the same 400.
pub async fn relay_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<JsonLine<ChatResponse>, RelayError> {
    let start_time = Instant::now();

    let request = decode_chat_request(&body).map_err(|e| {
        tracing::debug!(error = %e, body_bytes = body.len(), "Rejecting malformed chat request");
        e
    })?;

    tracing::info!(
        message_count = request.message_count(),
        "Relaying chat request upstream"
    );

    let response = state.upstream.complete(&request).await.map_err(|e| {
        tracing::error!(error = %e, "Upstream chat completion failed");
        RelayError::from(e)
    })?;

    tracing::info!(
        choice_count = response.choices().len(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Chat request relayed"
    );

    Ok(JsonLine(response))
}

/// Decode the first JSON value in `body`; anything after it is ignored
///
/// A top-level `null` decodes as an empty request.
pub fn decode_chat_request(body: &[u8]) -> Result<ChatRequest, RelayError> {
    serde_json::Deserializer::from_slice(body)
        .into_iter::<ChatRequest>()
        .next()
        .unwrap_or_else(|| Err(serde::de::Error::custom("empty request body")))
        .map_err(|e| RelayError::BadRequest(e.to_string()))
}
