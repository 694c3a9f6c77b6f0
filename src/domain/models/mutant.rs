//! Mutant catalog entries and detection results.
//!
//! Mutants are not generated by a mutation-operator algorithm: each one is a
//! hand-specified, solution-text-specific search/replace pair keyed by
//! `(problem_id, bug_type)`.

use serde::{Deserialize, Serialize};

/// A cataloged bug: one textual fragment substitution for one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutantSpec {
    /// Problem this spec applies to, e.g. "HumanEval/10".
    pub problem_id: String,
    /// Bug-type tag, e.g. "off_by_one".
    pub bug_type: String,
    /// Human-readable description of the injected defect.
    pub description: String,
    /// Why a real developer could plausibly write this bug.
    pub why_realistic: String,
    /// Fragment that must appear verbatim in the solution source.
    pub original_fragment: String,
    /// Fragment substituted in its place.
    pub buggy_fragment: String,
}

/// A constructed mutant: the full solution source with one defect injected.
///
/// An immutable alternate solution body; the frozen suite runs against it
/// unchanged during fault detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutant {
    /// Bug-type tag copied from the spec.
    pub bug_type: String,
    /// Defect description copied from the spec.
    pub description: String,
    /// Rationale copied from the spec.
    pub why_realistic: String,
    /// Mutated module source text.
    pub source: String,
}

/// Verdict for one `(mutant, frozen suite)` pair. Produced once, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Bug-type tag of the evaluated mutant.
    pub bug_type: String,
    /// Defect description.
    pub description: String,
    /// Rationale for the bug's realism.
    pub why_realistic: String,
    /// True when at least one test failed against the mutant.
    pub detected: bool,
    /// Tests that still passed against the mutant.
    pub tests_passed: u32,
    /// Tests that failed against the mutant.
    pub tests_failed: u32,
    /// Names of the failing tests.
    pub failed_test_names: Vec<String>,
    /// Set when the evaluation run itself failed (e.g. timed out). The
    /// mutant counts as not detected; there are no retries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_error: Option<String>,
}

/// A cataloged mutant that could not be constructed for this solution
/// variant. Excluded from the detection-rate denominator, never counted
/// as missed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotApplicable {
    /// Bug-type tag of the skipped spec.
    pub bug_type: String,
    /// Why the mutant could not be constructed.
    pub reason: String,
}
