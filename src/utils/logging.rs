//! Logging setup, powered by tracing-subscriber
//!
//! Events go to stderr so that command output on stdout stays clean.

use crate::utils::config::{LogConfig, LogFormat};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Quieted dependency targets, appended after the base level
const NOISY_TARGETS: &[(&str, &str)] = &[
    ("hyper", "warn"),
    ("hyper_util", "warn"),
    ("h2", "warn"),
    ("tower_http", "info"),
];

/// Build the filter from `RUST_LOG` if set, otherwise from the configured level.
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let filter_str = default_directives(level);
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", filter_str, e))
}

fn default_directives(level: &str) -> String {
    let mut directives = vec![level.to_string()];
    for (target, lvl) in NOISY_TARGETS {
        directives.push(format!("{}={}", target, lvl));
    }
    directives.join(",")
}

/// Install the global subscriber. Call once, before any work starts.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = build_env_filter(&config.level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;

    tracing::trace!(level = %config.level, format = %config.format, "logging initialized");
    Ok(())
}
