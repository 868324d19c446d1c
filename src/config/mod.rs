//! Configuration management module
//!
//! This module handles loading and validating settings for the relay and
//! the restart server from environment variables and `.env` files.

pub mod settings;

pub use settings::{
    LogFormat, RelaySettings, RestartSettings, DEFAULT_ENV_FILE, DEFAULT_GRACE_PERIOD_SECONDS,
    DEFAULT_PORT, DEFAULT_RESTART_PAUSE_SECONDS,
};
