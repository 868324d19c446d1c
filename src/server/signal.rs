//! OS signal handling
//!
//! `shutdown_signal` resolves once on the first SIGINT/SIGTERM and drives the
//! relay's graceful shutdown. `SignalTrigger` keeps listening for the same
//! signals and turns each one into a restart for the restart server.

use async_trait::async_trait;
use std::fmt;
use std::io;
use tokio::signal;

/// Which signal asked for the restart or shutdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalReason {
    Interrupt,
    Terminate,
    /// Injected programmatically (tests, embedding)
    Manual,
}

impl fmt::Display for SignalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalReason::Interrupt => write!(f, "SIGINT"),
            SignalReason::Terminate => write!(f, "SIGTERM"),
            SignalReason::Manual => write!(f, "manual"),
        }
    }
}

/// Source of restart requests
///
/// `wait` resolves with the reason for the next restart, or `None` once the
/// source can never fire again.
#[async_trait]
pub trait RestartTrigger: Send {
    async fn wait(&mut self) -> Option<SignalReason>;
}

#[async_trait]
impl RestartTrigger for tokio::sync::mpsc::Receiver<SignalReason> {
    async fn wait(&mut self) -> Option<SignalReason> {
        self.recv().await
    }
}

/// Restart trigger fed by SIGINT and SIGTERM
pub struct SignalTrigger {
    #[cfg(unix)]
    interrupt: signal::unix::Signal,
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl SignalTrigger {
    /// Install the signal handlers
    ///
    /// From here on SIGINT/SIGTERM no longer end the process.
    pub fn install() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use signal::unix::{signal as unix_signal, SignalKind};

            Ok(Self {
                interrupt: unix_signal(SignalKind::interrupt())?,
                terminate: unix_signal(SignalKind::terminate())?,
            })
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }
}

#[async_trait]
impl RestartTrigger for SignalTrigger {
    #[cfg(unix)]
    async fn wait(&mut self) -> Option<SignalReason> {
        tokio::select! {
            Some(()) = self.interrupt.recv() => Some(SignalReason::Interrupt),
            Some(()) = self.terminate.recv() => Some(SignalReason::Terminate),
            else => None,
        }
    }

    #[cfg(not(unix))]
    async fn wait(&mut self) -> Option<SignalReason> {
        signal::ctrl_c().await.ok().map(|_| SignalReason::Interrupt)
    }
}

/// Create a future that completes when a shutdown signal is received
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
