//! Tracing subscriber setup shared by both binaries

use crate::config::LogFormat;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level` when it is set.
pub fn init_tracing(log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let console_layer = match format {
        LogFormat::Json => fmt::layer().json().with_filter(filter).boxed(),
        LogFormat::Pretty => fmt::layer().with_filter(filter).boxed(),
    };

    tracing_subscriber::registry().with(console_layer).init();
}
