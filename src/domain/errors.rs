//! Error taxonomy for the amplification and fault-detection engines.

use thiserror::Error;

use crate::domain::ports::{GeneratorError, RunnerError};

/// Errors surfaced by the engines.
///
/// Iteration-scoped failures halt that problem's loop but never block other
/// problems in a batch; the orchestrator preserves the snapshots collected
/// before the failure and still emits a (partial) report.
#[derive(Debug, Error)]
pub enum AmplifyError {
    /// The external test generator failed during a `Generating` step.
    #[error("generator failed at iteration {iteration}: {source}")]
    Generator {
        iteration: u32,
        #[source]
        source: GeneratorError,
    },

    /// The execution bench failed during a `Baseline` or `Measuring` step.
    #[error("coverage run failed at iteration {iteration}: {source}")]
    Runner {
        iteration: u32,
        #[source]
        source: RunnerError,
    },

    /// The mutant catalog has no entry for the requested problem.
    #[error("no mutants cataloged for problem {0}")]
    NoMutantsForProblem(String),

    /// The catalog fragment was not found verbatim in the solution source.
    ///
    /// The catalog is solution-text-specific: a mismatch means this mutant
    /// cannot be generated for this particular solution variant, not that
    /// the run is broken.
    #[error("mutation {bug_type} not applicable to problem {problem_id}: fragment not found")]
    MutationNotApplicable { problem_id: String, bug_type: String },

    /// Report serialization or persistence failure.
    #[error("report error: {0}")]
    Report(String),
}

impl AmplifyError {
    /// Iteration at which the failure occurred, if iteration-scoped.
    pub fn iteration(&self) -> Option<u32> {
        match self {
            Self::Generator { iteration, .. } | Self::Runner { iteration, .. } => {
                Some(*iteration)
            }
            _ => None,
        }
    }
}

pub type AmplifyResult<T> = Result<T, AmplifyError>;

impl From<serde_json::Error> for AmplifyError {
    fn from(err: serde_json::Error) -> Self {
        AmplifyError::Report(err.to_string())
    }
}
