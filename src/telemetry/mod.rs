//! Tracing initialization.
//!
//! Diagnostics go to stderr through a tracing-subscriber fmt layer so that
//! stdout carries nothing but the progress stream.

pub mod run;

use crate::error::{Error, Result};

/// Configuration for telemetry initialization.
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is not set (e.g. "info", "hwpilot=debug").
    pub default_filter: String,
    /// Use compact single-line formatting.
    pub compact: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            compact: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber was already set.
pub fn init_telemetry(config: TelemetryConfig) -> Result<()> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .map_err(|e| Error::Config(format!("bad log filter {:?}: {e}", config.default_filter)))?;

    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.compact {
        registry.with(fmt_layer.compact()).try_init()
    } else {
        registry.with(fmt_layer).try_init()
    };

    result.map_err(|e| Error::Other(format!("failed to init tracing subscriber: {e}")))
}
