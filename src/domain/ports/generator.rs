//! Test candidate generator port.
//!
//! The generator is an external collaborator: given the problem, the
//! solution source, and the latest coverage snapshot, it returns raw text
//! believed to contain one or more test functions. No correctness guarantee
//! is made on the returned text; it may be malformed, may duplicate earlier
//! tests, and may reference symbols not in scope. The core defends against
//! all three.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::models::{CoverageSnapshot, Problem, Solution};

/// Everything a generator adapter needs to build its prompt.
///
/// The payload is the boundary: adapters own the prompt-template text, the
/// core owns what goes into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    /// Amplification iteration this request belongs to (1-based).
    pub iteration: u32,
    /// Name of the function under test.
    pub entry_point: String,
    /// Natural-language problem statement.
    pub problem_statement: String,
    /// Full solution source the tests will run against.
    pub solution_source: String,
    /// Coverage after the previous iteration.
    pub coverage: CoverageSnapshot,
    /// Branch outcomes still unexercised.
    pub uncovered_branches: u32,
    /// Candidate batches already accepted into the suite.
    pub accepted_batches: usize,
    /// Focus hint derived from the current branch-coverage band.
    pub focus_areas: Vec<String>,
}

impl PromptPayload {
    /// Assemble a payload from the loop's current state.
    pub fn new(
        iteration: u32,
        problem: &Problem,
        solution: &Solution,
        coverage: &CoverageSnapshot,
        accepted_batches: usize,
        focus_areas: Vec<String>,
    ) -> Self {
        Self {
            iteration,
            entry_point: problem.entry_point.clone(),
            problem_statement: problem.description.clone(),
            solution_source: solution.source.clone(),
            coverage: coverage.clone(),
            uncovered_branches: coverage.uncovered_branches(),
            accepted_batches,
            focus_areas,
        }
    }
}

/// Error types for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// No client is configured (missing API key or endpoint).
    #[error("generator not configured: {0}")]
    NotConfigured(String),

    /// The provider returned an error or the call failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider responded with no usable content.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// Port trait for the external test candidate generator.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for concurrent use across tokio
/// tasks; each problem's loop calls the generator sequentially.
#[async_trait]
pub trait TestCandidateGenerator: Send + Sync {
    /// Request a batch of candidate tests for the given payload.
    ///
    /// # Returns
    /// * `Ok(String)` - Raw candidate text (possibly fenced, possibly junk)
    /// * `Err(GeneratorError)` - The call failed; the loop does not retry
    async fn generate(&self, payload: &PromptPayload) -> Result<String, GeneratorError>;
}
