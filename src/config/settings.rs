//! Application settings and configuration
//!
//! Settings for both binaries are read from environment variables (optionally
//! seeded from a `.env` file) with sensible defaults, then overridden by CLI
//! arguments in `main`.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::services::upstream::{UpstreamConfig, DEFAULT_MODEL, DEFAULT_UPSTREAM_ENDPOINT};

/// Default listen port for both servers
pub const DEFAULT_PORT: u16 = 8080;

/// Env file read from the working directory when none is given
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default grace period for in-flight requests during a restart
pub const DEFAULT_GRACE_PERIOD_SECONDS: u64 = 10;

/// Default pause between shutdown and rebinding
pub const DEFAULT_RESTART_PAUSE_SECONDS: u64 = 2;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => anyhow::bail!("Invalid log format: {}. Expected: json or pretty", s),
        }
    }
}

/// Chat relay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelaySettings {
    // App settings
    pub app_name: String,
    pub app_version: String,
    pub log_level: String,
    pub log_format: LogFormat,

    // Server settings
    pub host: String,
    pub port: u16,

    // Upstream settings
    #[serde(skip_serializing)]
    pub openai_api_key: String,
    pub upstream_endpoint: String,
    pub model: String,
}

impl RelaySettings {
    /// Load settings, seeding the process environment from an env file first
    ///
    /// With `None` the `.env` file of the working directory is used. A
    /// missing env file is an error; an unset `OPEN_API_KEY` is not.
    /// Variables already present in the process environment win over the
    /// file.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => Self::load_from_file(path),
            None => {
                let cwd = env::current_dir().context("Cannot determine working directory")?;
                Self::load_from_dir(&cwd)
            }
        }
    }

    /// Load `dir/.env`; parent directories are not searched
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(DEFAULT_ENV_FILE))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        dotenvy::from_path(path)
            .with_context(|| format!("Error loading env file {}", path.display()))?;

        Self::from_env()
    }

    /// Read settings from the current process environment only
    pub fn from_env() -> Result<Self> {
        let settings = Self {
            app_name: env_or_default("APP_NAME", "chat-relay"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: env_or_default("LOG_LEVEL", "info"),
            log_format: env_or_default("LOG_FORMAT", "json")
                .parse()
                .unwrap_or_default(),

            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", &DEFAULT_PORT.to_string())
                .parse()
                .context("Invalid PORT value")?,

            openai_api_key: env::var("OPEN_API_KEY").unwrap_or_default(),
            upstream_endpoint: env_or_default("OPENAI_API_URL", DEFAULT_UPSTREAM_ENDPOINT),
            model: DEFAULT_MODEL.to_string(),
        };

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.upstream_endpoint.is_empty() {
            anyhow::bail!("Upstream endpoint cannot be empty");
        }

        if self.openai_api_key.is_empty() {
            tracing::warn!("OPEN_API_KEY is not set; upstream calls will carry an empty bearer token");
        }

        Ok(())
    }

    /// Get the server address string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the upstream client configuration from these settings
    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig::new(self.openai_api_key.clone())
            .with_endpoint(self.upstream_endpoint.clone())
            .with_model(self.model.clone())
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            app_name: "chat-relay".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            openai_api_key: String::new(),
            upstream_endpoint: DEFAULT_UPSTREAM_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Restart-on-signal server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RestartSettings {
    pub log_level: String,
    pub log_format: LogFormat,

    pub host: String,
    pub port: u16,

    /// Seconds in-flight requests get to finish before the listener is dropped
    pub grace_period_seconds: u64,

    /// Seconds to wait after shutdown before binding again
    pub restart_pause_seconds: u64,
}

impl RestartSettings {
    /// Load settings from the environment; a `.env` file is optional here
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path)
                    .with_context(|| format!("Error loading env file {}", path.display()))?;
            }
            None => {
                dotenvy::from_path(DEFAULT_ENV_FILE).ok();
            }
        }

        let settings = Self {
            log_level: env_or_default("LOG_LEVEL", "info"),
            log_format: env_or_default("LOG_FORMAT", "json")
                .parse()
                .unwrap_or_default(),
            host: env_or_default("HOST", "0.0.0.0"),
            port: env_or_default("PORT", &DEFAULT_PORT.to_string())
                .parse()
                .context("Invalid PORT value")?,
            grace_period_seconds: env_or_default(
                "SHUTDOWN_GRACE_SECONDS",
                &DEFAULT_GRACE_PERIOD_SECONDS.to_string(),
            )
            .parse()
            .context("Invalid SHUTDOWN_GRACE_SECONDS value")?,
            restart_pause_seconds: env_or_default(
                "RESTART_PAUSE_SECONDS",
                &DEFAULT_RESTART_PAUSE_SECONDS.to_string(),
            )
            .parse()
            .context("Invalid RESTART_PAUSE_SECONDS value")?,
        };

        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("Port cannot be 0");
        }

        if self.grace_period_seconds == 0 {
            anyhow::bail!("Shutdown grace period must be > 0");
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_seconds)
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_secs(self.restart_pause_seconds)
    }
}

impl Default for RestartSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            grace_period_seconds: DEFAULT_GRACE_PERIOD_SECONDS,
            restart_pause_seconds: DEFAULT_RESTART_PAUSE_SECONDS,
        }
    }
}

/// Helper function to get environment variable with default
fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
