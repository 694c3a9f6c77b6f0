//! Covforge - Coverage-Guided Test Suite Amplification
//!
//! Covforge grows a unit-test suite for a candidate solution by repeatedly
//! asking an external generator for tests aimed at uncovered branches,
//! merging the survivors into an append-only accumulated suite, and stopping
//! once branch coverage plateaus. The frozen suite is then run against a
//! fixed catalog of hand-specified mutants to check that the coverage gains
//! translate into actual fault detection.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure data models, error taxonomy, port traits
//! - **Service Layer** (`services`): Accumulation, convergence, mutation, evaluation
//! - **Application Layer** (`application`): The amplification loop and batch runner
//! - **Infrastructure Layer** (`infrastructure`): Config loading, logging, the
//!   pytest-backed execution bench, report persistence
//!
//! # Example
//!
//! ```ignore
//! use covforge::application::AmplificationOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Wire a generator and a bench, then drive the loop
//!     Ok(())
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{AmplificationOrchestrator, BatchRunner, ProblemOutcome};
pub use domain::errors::{AmplifyError, AmplifyResult};
pub use domain::models::{
    AmplificationReport, AmplifierConfig, Config, CoverageSnapshot, DetectionResult,
    FaultDetectionReport, GeneratorConfig, IterationRecord, Mutant, MutantSpec, Problem,
    RunnerConfig, Solution, SolutionOrigin,
};
pub use domain::ports::{
    CoverageMeasurement, GeneratorError, PromptPayload, RunnerError, SuiteOutcome, SuiteRun,
    TestBench, TestCandidateGenerator,
};
pub use infrastructure::config::ConfigLoader;
pub use services::{
    BugInjector, ConvergenceDetector, FaultDetectionEvaluator, MutantCatalog,
    TestSuiteAccumulator,
};
