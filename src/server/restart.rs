//! Restart-on-signal server lifecycle
//!
//! A [`RestartableServer`] serves a router on a fixed address and, each time
//! its [`RestartTrigger`] fires, shuts the listener down gracefully, waits
//! for a short pause and binds the same address again. It never exits on a
//! signal; `run` only returns when the trigger source is closed.
//!
//! Between shutdown and rebind nothing is listening, so connection attempts
//! in that window are refused.

use axum::Router;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::RestartSettings;
use crate::server::signal::RestartTrigger;

/// Lifecycle state of the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartState {
    /// A listener is (or is about to be) accepting connections
    Serving,
    /// Shutdown or the pause before rebinding is in progress
    Restarting,
}

#[derive(Error, Debug)]
pub enum RestartError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server already running on {0}")]
    AlreadyRunning(SocketAddr),

    #[error("Server error: {0}")]
    Serve(#[from] io::Error),

    #[error("Graceful shutdown did not finish within {0:?}")]
    GracePeriodExpired(Duration),

    #[error("Server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Timing knobs for the restart loop
#[derive(Debug, Clone, Copy)]
pub struct RestartConfig {
    pub addr: SocketAddr,
    pub grace_period: Duration,
    pub restart_pause: Duration,
}

impl RestartConfig {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            grace_period: Duration::from_secs(crate::config::DEFAULT_GRACE_PERIOD_SECONDS),
            restart_pause: Duration::from_secs(crate::config::DEFAULT_RESTART_PAUSE_SECONDS),
        }
    }

    pub fn from_settings(settings: &RestartSettings) -> Result<Self, std::net::AddrParseError> {
        Ok(Self {
            addr: settings.server_addr().parse()?,
            grace_period: settings.grace_period(),
            restart_pause: settings.restart_pause(),
        })
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_restart_pause(mut self, restart_pause: Duration) -> Self {
        self.restart_pause = restart_pause;
        self
    }
}

/// A listener currently being served on a background task
struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    handle: JoinHandle<io::Result<()>>,
}

/// HTTP server that restarts instead of exiting
pub struct RestartableServer {
    config: RestartConfig,
    router: Router,
    running: Option<RunningServer>,
    state: watch::Sender<RestartState>,
}

impl RestartableServer {
    pub fn new(config: RestartConfig, router: Router) -> Self {
        let (state, _) = watch::channel(RestartState::Serving);

        Self {
            config,
            router,
            running: None,
            state,
        }
    }

    /// Watch lifecycle transitions
    pub fn subscribe_state(&self) -> watch::Receiver<RestartState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RestartState {
        *self.state.borrow()
    }

    /// Address of the active listener, if any
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|running| running.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bind the configured address and start serving on a background task
    ///
    /// When the configured port is 0 the port picked by the first bind is
    /// kept for every later restart.
    pub async fn start(&mut self) -> Result<SocketAddr, RestartError> {
        if let Some(running) = &self.running {
            return Err(RestartError::AlreadyRunning(running.local_addr));
        }

        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| RestartError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        self.config.addr = local_addr;

        let shutdown = CancellationToken::new();
        let router = self.router.clone();
        let signal = shutdown.clone().cancelled_owned();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
        });

        tracing::info!(addr = %local_addr, "Server listening");

        self.running = Some(RunningServer {
            local_addr,
            shutdown,
            handle,
        });
        self.state.send_replace(RestartState::Serving);

        Ok(local_addr)
    }

    /// Stop accepting connections and wait up to the grace period for
    /// in-flight requests
    ///
    /// If the grace period runs out the server task is aborted and
    /// [`RestartError::GracePeriodExpired`] is returned. Stopping a server
    /// that is not running is a no-op.
    pub async fn stop(&mut self) -> Result<(), RestartError> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        tracing::info!(
            addr = %running.local_addr,
            grace_period_ms = self.config.grace_period.as_millis() as u64,
            "Shutting down server"
        );

        running.shutdown.cancel();

        let mut handle = running.handle;
        match tokio::time::timeout(self.config.grace_period, &mut handle).await {
            Ok(joined) => joined??,
            Err(_) => {
                handle.abort();
                return Err(RestartError::GracePeriodExpired(self.config.grace_period));
            }
        }

        tracing::info!(addr = %running.local_addr, "Server stopped");

        Ok(())
    }

    /// Serving -> Restarting -> Serving
    ///
    /// Errors from shutdown or rebinding are logged and never abort the
    /// transition.
    pub async fn restart(&mut self) {
        self.state.send_replace(RestartState::Restarting);

        if let Err(e) = self.stop().await {
            tracing::error!(error = %e, "Server shutdown failed");
        }

        tracing::info!(
            pause_ms = self.config.restart_pause.as_millis() as u64,
            "Waiting before restart"
        );
        tokio::time::sleep(self.config.restart_pause).await;

        if let Err(e) = self.start().await {
            tracing::error!(error = %e, "Server restart failed");
        }

        self.state.send_replace(RestartState::Serving);
    }

    /// Serve and restart on every trigger until the trigger source closes
    pub async fn run<T: RestartTrigger>(mut self, mut trigger: T) {
        if !self.is_running() {
            if let Err(e) = self.start().await {
                tracing::error!(error = %e, "Server start failed");
            }
        }

        while let Some(reason) = trigger.wait().await {
            tracing::info!(reason = %reason, "Restart requested");
            self.restart().await;
        }

        tracing::info!("Restart trigger closed, stopping server");
        if let Err(e) = self.stop().await {
            tracing::error!(error = %e, "Server shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::routes::create_greeting_router;

    fn local_config() -> RestartConfig {
        RestartConfig::new("127.0.0.1:0".parse().unwrap())
            .with_grace_period(Duration::from_secs(1))
            .with_restart_pause(Duration::from_millis(20))
    }

    #[test]
    fn test_config_from_settings() {
        let settings = RestartSettings {
            host: "127.0.0.1".to_string(),
            port: 9090,
            ..RestartSettings::default()
        };

        let config = RestartConfig::from_settings(&settings).unwrap();
        assert_eq!(config.addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.grace_period, Duration::from_secs(10));
        assert_eq!(config.restart_pause, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_start_twice_is_rejected() {
        let mut server = RestartableServer::new(local_config(), create_greeting_router());

        let addr = server.start().await.unwrap();
        assert_eq!(server.local_addr(), Some(addr));

        let err = server.start().await.unwrap_err();
        assert!(matches!(err, RestartError::AlreadyRunning(a) if a == addr));

        server.stop().await.unwrap();
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn test_stop_releases_port_and_is_idempotent() {
        let mut server = RestartableServer::new(local_config(), create_greeting_router());
        let addr = server.start().await.unwrap();

        server.stop().await.unwrap();
        server.stop().await.unwrap();

        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_restart_reuses_port() {
        let mut server = RestartableServer::new(local_config(), create_greeting_router());
        let first = server.start().await.unwrap();

        server.restart().await;

        assert_eq!(server.state(), RestartState::Serving);
        assert_eq!(server.local_addr(), Some(first));
        assert!(tokio::net::TcpStream::connect(first).await.is_ok());

        server.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_failure_is_reported() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = occupied.local_addr().unwrap();

        let mut server =
            RestartableServer::new(RestartConfig::new(addr), create_greeting_router());

        let err = server.start().await.unwrap_err();
        assert!(matches!(err, RestartError::Bind { .. }));
        assert!(!server.is_running());
    }
}
