//! Port trait definitions (Hexagonal Architecture).
//!
//! This module defines the async trait interfaces that infrastructure
//! adapters must implement:
//! - `TestCandidateGenerator`: the external LLM that proposes new tests
//! - `TestBench`: the external test-execution / coverage-instrumentation engine
//!
//! These traits are the only view the amplification loop has of the outside
//! world; the loop never touches filesystem paths or provider SDKs directly.

pub mod bench;
pub mod generator;

pub use bench::{CoverageMeasurement, RunnerError, SuiteOutcome, SuiteRun, TestBench};
pub use generator::{GeneratorError, PromptPayload, TestCandidateGenerator};
