//! Infrastructure layer: adapters and process-level concerns.

pub mod config;
pub mod logging;
pub mod pytest;
pub mod reports;

pub use config::ConfigLoader;
pub use pytest::PytestBench;
pub use reports::ReportStore;
