//! Problem and solution models.
//!
//! A `Problem` is one entry from the benchmark dataset; a `Solution` is the
//! candidate source under test, tagged with the model/strategy that produced
//! it. Both are immutable inputs to the amplification and fault-detection
//! engines.

use serde::{Deserialize, Serialize};

/// One benchmark problem: the unit whose generated solution gets tested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Stable identifier, e.g. "HumanEval/10".
    pub problem_id: String,
    /// Name of the function the test suite invokes.
    pub entry_point: String,
    /// Natural-language statement of the problem.
    pub description: String,
    /// Function signature, e.g. "def make_palindrome(string: str) -> str".
    pub signature: String,
}

impl Problem {
    pub fn new(
        problem_id: impl Into<String>,
        entry_point: impl Into<String>,
        description: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            problem_id: problem_id.into(),
            entry_point: entry_point.into(),
            description: description.into(),
            signature: signature.into(),
        }
    }

    /// Filesystem-safe form of the problem id ("HumanEval/10" -> "HumanEval_10").
    pub fn slug(&self) -> String {
        self.problem_id.replace(['/', '\\', ' '], "_")
    }
}

/// Which generation run produced a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionOrigin {
    /// Model tag, e.g. "gpt4o" or "claude".
    pub model: String,
    /// Prompting strategy tag, e.g. "cot" or "self_planning".
    pub strategy: String,
}

/// The candidate source code under test: one entry-point function plus any
/// helpers it needs, as a single module's source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Full module source text.
    pub source: String,
    /// Provenance of this solution variant.
    pub origin: SolutionOrigin,
}

impl Solution {
    pub fn new(source: impl Into<String>, model: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            origin: SolutionOrigin {
                model: model.into(),
                strategy: strategy.into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_slug_replaces_separators() {
        let problem = Problem::new("HumanEval/10", "make_palindrome", "desc", "sig");
        assert_eq!(problem.slug(), "HumanEval_10");
    }
}
