//! Upstream chat completions client
//!
//! This module forwards a list of chat messages to the completions API
//! with a bearer credential and parses the reply into [`ChatResponse`].
//! There is no retry, no status-code mapping and no timeout override: any
//! response that arrives over the wire is parsed as a completion.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::schemas::chat::{ChatRequest, ChatResponse, CompletionRequest};

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when calling the upstream API
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Client Trait
// ============================================================================

/// Something that can turn chat messages into a completion
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, UpstreamError>;
}

// ============================================================================
// OpenAI Client
// ============================================================================

/// Configuration for the upstream client
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Bearer token sent on every request (may be empty)
    pub api_key: String,

    /// Full URL of the completions endpoint
    pub endpoint: String,

    /// Model identifier added to every request
    pub model: String,
}

impl UpstreamConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_UPSTREAM_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Client for the OpenAI chat completions endpoint
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: UpstreamConfig,
}

impl OpenAiClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self::with_http_client(Client::new(), config)
    }

    /// Use a preconfigured HTTP client (proxies, custom TLS, tests)
    pub fn with_http_client(client: Client, config: UpstreamConfig) -> Self {
        tracing::debug!(
            endpoint = %config.endpoint,
            model = %config.model,
            "Initialized upstream completions client"
        );

        Self { client, config }
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, UpstreamError> {
        let body = serde_json::to_vec(&CompletionRequest {
            messages: &request.messages,
            model: &self.config.model,
        })?;

        tracing::debug!(
            endpoint = %self.config.endpoint,
            model = %self.config.model,
            message_count = request.message_count(),
            "Calling upstream chat completions API"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .bearer_auth(&self.config.api_key)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                "Upstream returned a non-success status, parsing body anyway"
            );
        }

        let bytes = response.bytes().await?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
