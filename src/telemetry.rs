//! Logging setup

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Output format of the log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Format named in the configuration; anything but `json` is pretty
    #[must_use]
    pub fn from_config(format: &str) -> Self {
        if format == "json" {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to stderr.
pub fn init(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| anyhow!("Invalid log filter: {e}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match LogFormat::from_config(&logging.format) {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    installed.map_err(|e| anyhow!("Failed to install logger: {e}"))
}
