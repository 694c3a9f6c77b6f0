//! Domain layer for the covforge amplification system.
//!
//! This module contains the core data models, the error taxonomy, and the
//! port traits that infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{AmplifyError, AmplifyResult};
