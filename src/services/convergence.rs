//! Plateau detection over the branch-coverage trajectory.
//!
//! The rule compares snapshots at offsets of exactly 2 inside a trailing
//! window: with `window = 3` the detector inspects the last 4 snapshots and
//! the two overlapping pairs `(b_k, b_{k+2})` they contain. Coverage must be
//! essentially flat across two full iteration-steps at a time, for the whole
//! trailing window, before a plateau is trusted; a single late jump anywhere
//! in the window keeps the loop going.

use tracing::trace;

use crate::domain::models::{AmplifierConfig, CoverageSnapshot};

/// Stateless convergence check, re-derivable from the snapshot list alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceDetector {
    /// Trailing snapshots inspected per check.
    window: usize,
    /// Maximum branch-coverage gain (percentage points) across a 2-apart
    /// pair for that pair to count as flat.
    threshold: f64,
}

impl Default for ConvergenceDetector {
    fn default() -> Self {
        Self::from_config(&AmplifierConfig::default())
    }
}

impl ConvergenceDetector {
    /// Build a detector from the loop configuration.
    pub fn from_config(config: &AmplifierConfig) -> Self {
        Self {
            window: config.convergence_window,
            threshold: config.convergence_threshold,
        }
    }

    /// Check a branch-coverage percentage sequence for a plateau.
    ///
    /// Fewer than `window + 1` values can never converge. Otherwise the last
    /// `window + 1` values are inspected: converged iff every 2-apart delta
    /// `b[k+2] - b[k]` within that slice is at most the threshold.
    pub fn is_converged(&self, branch_trajectory: &[f64]) -> bool {
        if branch_trajectory.len() < self.window + 1 {
            return false;
        }
        let tail = &branch_trajectory[branch_trajectory.len() - (self.window + 1)..];
        let converged = (0..tail.len() - 2).all(|k| tail[k + 2] - tail[k] <= self.threshold);
        trace!(?tail, converged, "convergence check");
        converged
    }

    /// Check a snapshot trajectory for a plateau.
    pub fn check(&self, trajectory: &[CoverageSnapshot]) -> bool {
        let branch: Vec<f64> = trajectory
            .iter()
            .map(|snapshot| snapshot.branch_coverage)
            .collect();
        self.is_converged(&branch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_trajectory_never_converges() {
        let detector = ConvergenceDetector::default();
        assert!(!detector.is_converged(&[]));
        assert!(!detector.is_converged(&[50.0]));
        assert!(!detector.is_converged(&[50.0, 51.0, 52.0]));
    }

    #[test]
    fn test_flat_tail_converges() {
        // Last 4 snapshots [80, 81, 82, 83]: deltas (80,82)=2 and (81,83)=2,
        // both within the 3-point threshold. Early jumps are outside the
        // window and do not matter.
        let detector = ConvergenceDetector::default();
        assert!(detector.is_converged(&[10.0, 50.0, 80.0, 81.0, 82.0, 83.0]));
    }

    #[test]
    fn test_late_jump_keeps_looping() {
        // (81, 92) = 11 points: still improving.
        let detector = ConvergenceDetector::default();
        assert!(!detector.is_converged(&[10.0, 50.0, 80.0, 81.0, 85.0, 92.0]));
    }

    #[test]
    fn test_jump_at_window_edge_keeps_looping() {
        // (70, 81) = 11 points in the first pair of the tail.
        let detector = ConvergenceDetector::default();
        assert!(!detector.is_converged(&[10.0, 70.0, 80.0, 81.0, 82.0]));
    }

    #[test]
    fn test_delta_equal_to_threshold_counts_as_flat() {
        let detector = ConvergenceDetector::default();
        assert!(detector.is_converged(&[80.0, 81.0, 83.0, 84.0]));
    }

    #[test]
    fn test_exactly_window_plus_one_snapshots() {
        let detector = ConvergenceDetector::default();
        assert!(detector.is_converged(&[80.0, 81.0, 82.0, 83.0]));
        assert!(!detector.is_converged(&[80.0, 81.0, 82.0, 90.0]));
    }

    #[test]
    fn test_check_reads_branch_coverage() {
        let detector = ConvergenceDetector::default();
        let trajectory: Vec<CoverageSnapshot> = [80.0, 81.0, 82.0, 83.0]
            .iter()
            .enumerate()
            .map(|(i, &branch)| CoverageSnapshot {
                iteration: u32::try_from(i).unwrap(),
                line_coverage: 100.0,
                branch_coverage: branch,
                lines_covered: 10,
                lines_total: 10,
                branches_covered: 8,
                branches_total: 10,
                tests_passed: 5,
                tests_failed: 0,
            })
            .collect();
        assert!(detector.check(&trajectory));
    }
}
