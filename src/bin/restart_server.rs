//! Restart Server
//!
//! Serves "Hello, World!" and answers SIGINT/SIGTERM by restarting its
//! listener instead of exiting.

use anyhow::{Context, Result};
use chat_relay::{
    config::{LogFormat, RestartSettings},
    logging::init_tracing,
    server::{routes::create_greeting_router, RestartConfig, RestartableServer, SignalTrigger},
};
use clap::Parser;
use std::path::PathBuf;

/// Restart Server
///
/// Hello-world HTTP server that restarts on SIGINT/SIGTERM.
#[derive(Parser, Debug)]
#[command(name = "restart-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional env file with settings
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

    /// Seconds in-flight requests get during a restart
    #[arg(long)]
    grace_period: Option<u64>,

    /// Seconds to wait before listening again
    #[arg(long)]
    restart_pause: Option<u64>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (overrides LOG_FORMAT env var)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = RestartSettings::load(args.env_file.as_deref())?;

    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(grace_period) = args.grace_period {
        settings.grace_period_seconds = grace_period;
    }
    if let Some(restart_pause) = args.restart_pause {
        settings.restart_pause_seconds = restart_pause;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_format) = args.log_format {
        settings.log_format = log_format;
    }
    settings.validate()?;

    init_tracing(&settings.log_level, settings.log_format);

    let config = RestartConfig::from_settings(&settings).context("Invalid listen address")?;

    tracing::info!(
        addr = %config.addr,
        grace_period_seconds = settings.grace_period_seconds,
        restart_pause_seconds = settings.restart_pause_seconds,
        "Starting restart server"
    );

    let trigger = SignalTrigger::install().context("Failed to install signal handlers")?;

    // Only returns if the signal streams close
    RestartableServer::new(config, create_greeting_router())
        .run(trigger)
        .await;

    Ok(())
}
