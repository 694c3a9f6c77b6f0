//! Prompt payload construction.
//!
//! The loop owns what goes into a generation request; generator adapters own
//! how it is phrased. `focus_areas` picks target hints from the current
//! branch-coverage band so later iterations aim at what is still uncovered.

use crate::domain::models::{CoverageSnapshot, Problem, Solution};
use crate::domain::ports::PromptPayload;

/// Coverage band below which basic conditional paths are the target.
const BAND_BASIC: f64 = 30.0;
/// Coverage band below which error-handling paths are the target.
const BAND_ERRORS: f64 = 70.0;

/// Hints for the generator, chosen from the current branch-coverage band.
pub fn focus_areas(branch_coverage: f64) -> Vec<String> {
    if branch_coverage < BAND_BASIC {
        vec![
            "Target basic conditional branches".to_string(),
            "Test simple if/else paths".to_string(),
        ]
    } else if branch_coverage < BAND_ERRORS {
        vec![
            "Target error handling paths".to_string(),
            "Test exception scenarios".to_string(),
        ]
    } else {
        vec![
            "Target edge cases and corner scenarios".to_string(),
            "Test rare branch combinations".to_string(),
        ]
    }
}

/// Assemble the payload for one generation request.
pub fn build_payload(
    iteration: u32,
    problem: &Problem,
    solution: &Solution,
    latest: &CoverageSnapshot,
    accepted_batches: usize,
) -> PromptPayload {
    // The first iteration asks for a broad suite; focus hints only help once
    // a real coverage picture exists.
    let focus = if iteration <= 1 {
        Vec::new()
    } else {
        focus_areas(latest.branch_coverage)
    };
    PromptPayload::new(iteration, problem, solution, latest, accepted_batches, focus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(branch: f64) -> CoverageSnapshot {
        CoverageSnapshot {
            iteration: 1,
            line_coverage: branch,
            branch_coverage: branch,
            lines_covered: 5,
            lines_total: 10,
            branches_covered: 3,
            branches_total: 10,
            tests_passed: 4,
            tests_failed: 0,
        }
    }

    #[test]
    fn test_focus_bands() {
        assert!(focus_areas(10.0)[0].contains("basic conditional"));
        assert!(focus_areas(50.0)[0].contains("error handling"));
        assert!(focus_areas(90.0)[0].contains("edge cases"));
    }

    #[test]
    fn test_first_iteration_has_no_focus_hints() {
        let problem = Problem::new("HumanEval/10", "make_palindrome", "desc", "sig");
        let solution = Solution::new("def make_palindrome(s): ...", "claude", "cot");
        let payload = build_payload(1, &problem, &solution, &snapshot(40.0), 0);
        assert!(payload.focus_areas.is_empty());

        let payload = build_payload(2, &problem, &solution, &snapshot(40.0), 1);
        assert!(!payload.focus_areas.is_empty());
    }

    #[test]
    fn test_payload_carries_uncovered_branch_count() {
        let problem = Problem::new("HumanEval/10", "make_palindrome", "desc", "sig");
        let solution = Solution::new("def make_palindrome(s): ...", "claude", "cot");
        let payload = build_payload(2, &problem, &solution, &snapshot(30.0), 1);
        assert_eq!(payload.uncovered_branches, 7);
        assert_eq!(payload.entry_point, "make_palindrome");
    }
}
