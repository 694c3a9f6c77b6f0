//! Configuration structs.
//!
//! All knobs live in explicit, serde-defaulted structs: the generator client
//! receives its `GeneratorConfig` by value, never through ambient process
//! state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded hierarchically by
/// `infrastructure::config::ConfigLoader`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Amplification loop parameters.
    #[serde(default)]
    pub amplifier: AmplifierConfig,
    /// External generator client settings.
    #[serde(default)]
    pub generator: GeneratorConfig,
    /// Execution bench settings.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of the amplification loop and its convergence rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplifierConfig {
    /// Hard cap on amplification iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Trailing snapshots inspected by the convergence detector.
    #[serde(default = "default_convergence_window")]
    pub convergence_window: usize,
    /// Maximum branch-coverage gain (percentage points) across a 2-apart
    /// snapshot pair for the pair to count as flat.
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
}

fn default_max_iterations() -> u32 {
    10
}

fn default_convergence_window() -> usize {
    3
}

fn default_convergence_threshold() -> f64 {
    3.0
}

impl Default for AmplifierConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            convergence_window: default_convergence_window(),
            convergence_threshold: default_convergence_threshold(),
        }
    }
}

/// Settings for the external test candidate generator client.
///
/// Passed into generator adapter constructors; there is no process-wide
/// singleton client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Provider API key. Absent means the generator is not configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier sent to the provider.
    #[serde(default = "default_generator_model")]
    pub model: String,
    /// Maximum tokens to generate per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_generator_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_generator_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Settings for the pytest-backed execution bench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Python interpreter used to launch pytest.
    #[serde(default = "default_python")]
    pub python: String,
    /// Timeout for one instrumented coverage run.
    #[serde(default = "default_run_timeout")]
    pub run_timeout_seconds: u64,
    /// Timeout for one uninstrumented mutant evaluation run.
    #[serde(default = "default_evaluation_timeout")]
    pub evaluation_timeout_seconds: u64,
    /// Root of the per-run scratch directories. Each run writes to a
    /// distinct subdirectory keyed by problem id and run label, so
    /// concurrent problems never clobber each other.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Directory report artifacts are written to.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_run_timeout() -> u64 {
    30
}

fn default_evaluation_timeout() -> u64 {
    60
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(".covforge/scratch")
}

fn default_report_dir() -> PathBuf {
    PathBuf::from(".covforge/reports")
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            run_timeout_seconds: default_run_timeout(),
            evaluation_timeout_seconds: default_evaluation_timeout(),
            scratch_dir: default_scratch_dir(),
            report_dir: default_report_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: json or pretty.
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
