//! Execution bench port.
//!
//! The bench wraps the external test-execution and coverage-instrumentation
//! engine. The loop hands it source text plus a run key and gets
//! measurements back; it never sees where (or whether) the sources land on
//! disk. Individual test failures are data in the result, not errors.

use async_trait::async_trait;

/// One request to execute a materialized suite against a target module.
///
/// `problem_slug` and `label` key the bench's scratch location: each
/// iteration and each mutant evaluation uses a distinct label, so concurrent
/// problems and sequential runs never clobber each other's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteRun {
    /// Filesystem-safe problem identifier.
    pub problem_slug: String,
    /// Distinguishes runs within a problem, e.g. "iter3" or "bug_off_by_one".
    pub label: String,
    /// Materialized test module source.
    pub suite_source: String,
    /// Target module source the suite runs against.
    pub target_source: String,
    /// Entry-point name, exposed to the suite via the bench's fixture.
    pub entry_point: String,
}

/// Line and branch measurements for one instrumented run.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageMeasurement {
    /// Statement coverage percentage for the target module.
    pub line_coverage: f64,
    /// Branch coverage percentage for the target module.
    pub branch_coverage: f64,
    /// Statements executed.
    pub lines_covered: u32,
    /// Statements in the target module.
    pub lines_total: u32,
    /// Branch outcomes exercised.
    pub branches_covered: u32,
    /// Branch outcomes in the target module.
    pub branches_total: u32,
    /// Tests that passed.
    pub tests_passed: u32,
    /// Tests that failed.
    pub tests_failed: u32,
}

/// Pass/fail outcome of one uninstrumented run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteOutcome {
    /// Tests that passed.
    pub tests_passed: u32,
    /// Tests that failed.
    pub tests_failed: u32,
    /// Names of the failing tests, in report order.
    pub failed_test_names: Vec<String>,
}

impl SuiteOutcome {
    /// Whether any test failed.
    pub fn any_failed(&self) -> bool {
        self.tests_failed > 0
    }
}

/// Error types for bench operations.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The run exceeded its hard execution-time bound.
    #[error("test run exceeded {seconds}s timeout")]
    Timeout { seconds: u64 },

    /// The instrumentation output had no entry for the target module.
    #[error("coverage output has no entry for {target}; files present: {}", available.join(", "))]
    CoverageMissing {
        target: String,
        available: Vec<String>,
    },

    /// The engine could not be launched or produced unreadable output.
    #[error("test execution failed: {0}")]
    ExecutionFailed(String),

    /// Filesystem error while materializing or reading run artifacts.
    #[error("bench I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port trait for the test-execution / coverage engine.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; each problem runs its suite
/// sequentially, but independent problems may call the bench concurrently
/// with distinct `SuiteRun` keys.
#[async_trait]
pub trait TestBench: Send + Sync {
    /// Execute the suite with line+branch instrumentation scoped to the
    /// target module, within the bench's coverage-run timeout.
    async fn measure(&self, run: &SuiteRun) -> Result<CoverageMeasurement, RunnerError>;

    /// Execute the suite without instrumentation and report pass/fail only,
    /// within the bench's evaluation timeout. Used by fault detection.
    async fn execute(&self, run: &SuiteRun) -> Result<SuiteOutcome, RunnerError>;
}
