//! Application layer: the amplification loop and the batch runner.

pub mod batch;
pub mod orchestrator;

pub use batch::{BatchRunner, ProblemOutcome, ProblemRun};
pub use orchestrator::{AmplificationOrchestrator, AmplificationOutcome};
