//! Configuration loading.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_iterations: {0}. Must be between 1 and 100")]
    InvalidMaxIterations(u32),

    #[error("Invalid convergence_window: {0}. Must be at least 1")]
    InvalidConvergenceWindow(usize),

    #[error("Invalid convergence_threshold: {0}. Must be positive")]
    InvalidConvergenceThreshold(f64),

    #[error("Invalid timeout: {0}s. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Python interpreter cannot be empty")]
    EmptyPython,

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 1.0")]
    InvalidTemperature(f32),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .covforge/config.yaml (project config)
    /// 3. Environment variables (`COVFORGE_` prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".covforge/config.yaml"))
            .merge(Env::prefixed("COVFORGE_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.amplifier.max_iterations == 0 || config.amplifier.max_iterations > 100 {
            return Err(ConfigError::InvalidMaxIterations(
                config.amplifier.max_iterations,
            ));
        }
        if config.amplifier.convergence_window == 0 {
            return Err(ConfigError::InvalidConvergenceWindow(
                config.amplifier.convergence_window,
            ));
        }
        if config.amplifier.convergence_threshold <= 0.0 {
            return Err(ConfigError::InvalidConvergenceThreshold(
                config.amplifier.convergence_threshold,
            ));
        }

        if config.runner.run_timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout(config.runner.run_timeout_seconds));
        }
        if config.runner.evaluation_timeout_seconds == 0 {
            return Err(ConfigError::InvalidTimeout(
                config.runner.evaluation_timeout_seconds,
            ));
        }
        if config.runner.python.is_empty() {
            return Err(ConfigError::EmptyPython);
        }

        if config.generator.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(config.generator.max_tokens));
        }
        if !(0.0..=1.0).contains(&config.generator.temperature) {
            return Err(ConfigError::InvalidTemperature(config.generator.temperature));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
