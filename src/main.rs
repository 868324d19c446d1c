//! Chat Relay
//!
//! Forwards chat messages to an upstream completions API and relays the
//! parsed response.

use anyhow::Result;
use chat_relay::{
    config::{LogFormat, RelaySettings},
    logging::init_tracing,
    server::App,
};
use clap::Parser;
use std::path::PathBuf;

/// Chat Relay
///
/// Single-endpoint proxy in front of the chat completions API.
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Env file holding OPEN_API_KEY (defaults to .env; must exist)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

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

    // A missing env file stops the process here, before anything binds
    let mut settings = RelaySettings::load(args.env_file.as_deref())?;

    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_format) = args.log_format {
        settings.log_format = log_format;
    }

    init_tracing(&settings.log_level, settings.log_format);

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        host = %settings.host,
        port = %settings.port,
        upstream = %settings.upstream_endpoint,
        model = %settings.model,
        "Starting application"
    );

    App::new(settings).run_with_graceful_shutdown().await?;

    tracing::info!("Application shutdown complete");

    Ok(())
}
