//! Chat relay server
//!
//! Wires settings, state and router together and serves them until a
//! shutdown signal arrives.

use crate::{
    config::RelaySettings,
    server::{routes, signal::shutdown_signal, state::AppState},
};
use anyhow::{Context, Result};
use std::net::SocketAddr;

/// Main relay application
pub struct App {
    settings: RelaySettings,
    state: AppState,
}

impl App {
    /// Create the relay with the upstream client described by `settings`
    pub fn new(settings: RelaySettings) -> Self {
        let state = AppState::new(settings.clone());
        Self { settings, state }
    }

    /// Run the server until SIGINT (Ctrl+C) or SIGTERM
    pub async fn run_with_graceful_shutdown(self) -> Result<()> {
        let addr = self
            .settings
            .server_addr()
            .parse::<SocketAddr>()
            .context("Invalid listen address")?;
        let router = routes::create_router(self.state);

        tracing::info!("Starting chat relay on {} with graceful shutdown enabled", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
