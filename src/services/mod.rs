//! Service layer: the algorithmic pieces of the two engines.

pub mod accumulator;
pub mod candidate;
pub mod convergence;
pub mod fault_detection;
pub mod mutation;
pub mod prompt;

pub use accumulator::TestSuiteAccumulator;
pub use convergence::ConvergenceDetector;
pub use fault_detection::FaultDetectionEvaluator;
pub use mutation::{BugInjector, MutantCatalog};
