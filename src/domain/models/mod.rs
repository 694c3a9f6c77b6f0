//! Domain models for amplification runs.

pub mod config;
pub mod coverage;
pub mod mutant;
pub mod problem;
pub mod report;
pub mod suite;

pub use config::{AmplifierConfig, Config, GeneratorConfig, LoggingConfig, RunnerConfig};
pub use coverage::CoverageSnapshot;
pub use mutant::{DetectionResult, Mutant, MutantSpec, NotApplicable};
pub use problem::{Problem, Solution, SolutionOrigin};
pub use report::{AmplificationReport, CoveragePair, FaultDetectionReport, IterationRecord, MutantVerdict};
pub use suite::{IterationGroup, MergeOutcome, TestUnit};
