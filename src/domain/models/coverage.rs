//! Coverage snapshot model.
//!
//! One `CoverageSnapshot` is produced per loop iteration by the execution
//! bench; the ordered sequence of snapshots forms the coverage trajectory
//! that the convergence detector inspects.

use serde::{Deserialize, Serialize};

/// Coverage and test-outcome measurements for one iteration.
///
/// Immutable once created. Percentages are in the 0.0..=100.0 range,
/// rounded to two decimal places by the producing bench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSnapshot {
    /// Iteration that produced this snapshot (0 = baseline suite).
    pub iteration: u32,
    /// Percentage of statements executed in the target module.
    pub line_coverage: f64,
    /// Percentage of conditional-edge outcomes exercised.
    pub branch_coverage: f64,
    /// Statements executed.
    pub lines_covered: u32,
    /// Statements in the target module.
    pub lines_total: u32,
    /// Branch outcomes exercised.
    pub branches_covered: u32,
    /// Branch outcomes in the target module.
    pub branches_total: u32,
    /// Tests that passed in this run.
    pub tests_passed: u32,
    /// Tests that failed in this run. Failures are data, not errors.
    pub tests_failed: u32,
}

/// Round a percentage to two decimal places, matching what the bench
/// reports.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl CoverageSnapshot {
    /// Branch outcomes not yet exercised by the suite.
    pub fn uncovered_branches(&self) -> u32 {
        self.branches_total.saturating_sub(self.branches_covered)
    }

    /// Total tests executed in this run.
    pub fn total_tests(&self) -> u32 {
        self.tests_passed + self.tests_failed
    }

    /// Whether every branch outcome has been exercised.
    pub fn is_full_branch_coverage(&self) -> bool {
        self.branch_coverage >= 100.0
    }
}
