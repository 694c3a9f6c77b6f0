//! Logging initialization using tracing.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::domain::models::LoggingConfig;

/// Initialize the global tracing subscriber from config.
///
/// `RUST_LOG` overrides the configured level. Safe to call once per
/// process; a second call returns an error from the subscriber registry.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let default_level = parse_log_level(&config.level)?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .try_init()
            .map_err(|e| anyhow!("failed to initialize logger: {e}")),
        _ => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .try_init()
            .map_err(|e| anyhow!("failed to initialize logger: {e}")),
    }
}

/// Parse a level name into a tracing `Level`.
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(anyhow!("unknown log level: {other}")),
    }
}
