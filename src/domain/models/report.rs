//! Report artifacts emitted by the two engines.
//!
//! Every run yields a report, even a degenerate one-iteration report, so
//! downstream comparison tooling never special-cases "no data".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::coverage::CoverageSnapshot;
use super::mutant::{DetectionResult, NotApplicable};

/// Line/branch coverage percentages as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoveragePair {
    /// Statement coverage percentage.
    pub line: f64,
    /// Branch coverage percentage.
    pub branch: f64,
}

impl CoveragePair {
    /// Project the line/branch percentages out of a snapshot.
    pub fn from_snapshot(snapshot: &CoverageSnapshot) -> Self {
        Self {
            line: snapshot.line_coverage,
            branch: snapshot.branch_coverage,
        }
    }
}

/// Per-iteration record in the amplification report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration number (0 = baseline).
    pub iteration: u32,
    /// Statement coverage after this iteration.
    pub line_coverage: f64,
    /// Branch coverage after this iteration.
    pub branch_coverage: f64,
    /// Tests that passed in this iteration's run.
    pub tests_passed: u32,
    /// Tests that failed in this iteration's run.
    pub tests_failed: u32,
    /// Candidate tests accepted at this iteration (0 for the baseline).
    pub new_tests_added: usize,
    /// Candidate tests dropped as duplicates at this iteration.
    pub duplicates_removed: usize,
}

impl IterationRecord {
    /// Build a record from a snapshot plus the merge counters for the
    /// iteration that produced it.
    pub fn new(snapshot: &CoverageSnapshot, new_tests_added: usize, duplicates_removed: usize) -> Self {
        Self {
            iteration: snapshot.iteration,
            line_coverage: snapshot.line_coverage,
            branch_coverage: snapshot.branch_coverage,
            tests_passed: snapshot.tests_passed,
            tests_failed: snapshot.tests_failed,
            new_tests_added,
            duplicates_removed,
        }
    }
}

/// Final artifact of one problem's amplification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmplificationReport {
    /// Unique id for this run.
    pub run_id: Uuid,
    /// Problem the run amplified tests for.
    pub problem_id: String,
    /// Coverage of the baseline suite (iteration 0).
    pub baseline_coverage: CoveragePair,
    /// Coverage of the final accumulated suite.
    pub final_coverage: CoveragePair,
    /// Final minus baseline coverage, rounded to two decimals.
    pub total_improvement: CoveragePair,
    /// Amplification iterations performed (baseline excluded).
    pub total_iterations: u32,
    /// Whether the convergence detector signaled a plateau. False when the
    /// loop ended for another reason (full coverage, cap, no new tests) and
    /// the trailing window still showed movement.
    pub converged: bool,
    /// One record per snapshot, in trajectory order.
    pub iterations: Vec<IterationRecord>,
    /// The frozen, materialized suite the run produced.
    pub final_suite: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}

impl AmplificationReport {
    /// The full coverage trajectory as (line, branch) pairs.
    pub fn trajectory(&self) -> Vec<CoveragePair> {
        self.iterations
            .iter()
            .map(|record| CoveragePair {
                line: record.line_coverage,
                branch: record.branch_coverage,
            })
            .collect()
    }
}

/// Per-mutant entry in the fault-detection report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutantVerdict {
    /// Bug-type tag.
    pub bug_type: String,
    /// Defect description.
    pub description: String,
    /// Whether the suite caught the mutant.
    pub detected: bool,
    /// Tests that failed against the mutant.
    pub tests_failed: u32,
    /// Names of the failing tests.
    pub failed_test_names: Vec<String>,
}

impl From<&DetectionResult> for MutantVerdict {
    fn from(result: &DetectionResult) -> Self {
        Self {
            bug_type: result.bug_type.clone(),
            description: result.description.clone(),
            detected: result.detected,
            tests_failed: result.tests_failed,
            failed_test_names: result.failed_test_names.clone(),
        }
    }
}

/// Final artifact of one problem's fault-detection phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultDetectionReport {
    /// Problem the mutants belong to.
    pub problem_id: String,
    /// Mutants actually constructed and evaluated.
    pub total_bugs_injected: usize,
    /// Mutants caught by at least one failing test.
    pub bugs_detected: usize,
    /// Mutants every test passed against.
    pub bugs_missed: usize,
    /// Detected / injected, as a percentage rounded to two decimals.
    /// Zero when no mutant could be constructed.
    pub detection_rate: f64,
    /// One verdict per evaluated mutant.
    pub mutants: Vec<MutantVerdict>,
    /// Cataloged mutants whose fragment was absent from this solution
    /// variant; reported separately, excluded from the denominator.
    pub not_applicable: Vec<NotApplicable>,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}
