//! Application state container
//!
//! This module defines the shared state that is passed to the relay
//! handlers via Axum's state extraction.

use crate::config::RelaySettings;
use crate::services::upstream::{CompletionClient, OpenAiClient};
use std::sync::Arc;
use std::time::Instant;

/// Shared relay state
///
/// Cheap to clone; every field is behind an `Arc` or `Copy`.
#[derive(Clone)]
pub struct AppState {
    /// Application settings
    pub settings: Arc<RelaySettings>,

    /// Client used to reach the completions API
    pub upstream: Arc<dyn CompletionClient>,

    /// Application start time (for uptime calculation)
    pub start_time: Instant,
}

impl AppState {
    /// Create state with the default OpenAI client built from `settings`
    pub fn new(settings: RelaySettings) -> Self {
        let upstream = Arc::new(OpenAiClient::new(settings.upstream_config()));
        Self::with_client(settings, upstream)
    }

    /// Create state around an explicit upstream client
    pub fn with_client(settings: RelaySettings, upstream: Arc<dyn CompletionClient>) -> Self {
        tracing::debug!(
            upstream_endpoint = %settings.upstream_endpoint,
            model = %settings.model,
            "Relay state initialized"
        );

        Self {
            settings: Arc::new(settings),
            upstream,
            start_time: Instant::now(),
        }
    }

    /// Get the application uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
