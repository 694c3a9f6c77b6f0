//! Mutant catalog and bug injection.
//!
//! There is no mutation-generation algorithm here: every mutant is a
//! hand-specified `(problem_id, bug_type)` entry carrying an original/buggy
//! fragment pair as data. Injection is a single substring replacement of the
//! first occurrence, and a fragment that does not appear verbatim in the
//! given solution is a first-class "not applicable" outcome, not a crash.

use std::collections::HashMap;

use tracing::warn;

use crate::domain::errors::{AmplifyError, AmplifyResult};
use crate::domain::models::{Mutant, MutantSpec, Solution};

/// Fixed per-problem table of hand-written bugs.
#[derive(Debug, Clone, Default)]
pub struct MutantCatalog {
    specs: HashMap<String, Vec<MutantSpec>>,
}

impl MutantCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one spec to the catalog, keyed by its problem id.
    pub fn register(&mut self, spec: MutantSpec) {
        self.specs
            .entry(spec.problem_id.clone())
            .or_default()
            .push(spec);
    }

    /// Specs cataloged for a problem, in registration order.
    pub fn mutants_for(&self, problem_id: &str) -> Option<&[MutantSpec]> {
        self.specs.get(problem_id).map(Vec::as_slice)
    }

    /// Look up one spec by its `(problem_id, bug_type)` key.
    pub fn spec(&self, problem_id: &str, bug_type: &str) -> Option<&MutantSpec> {
        self.specs
            .get(problem_id)?
            .iter()
            .find(|spec| spec.bug_type == bug_type)
    }

    /// Problems with at least one cataloged mutant.
    pub fn problem_ids(&self) -> Vec<&str> {
        self.specs.keys().map(String::as_str).collect()
    }

    /// The built-in catalog: five hand-written bugs each for the palindrome
    /// and closest-elements problems.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for spec in palindrome_specs() {
            catalog.register(spec);
        }
        for spec in closest_elements_specs() {
            catalog.register(spec);
        }
        catalog
    }
}

fn spec(
    problem_id: &str,
    bug_type: &str,
    description: &str,
    why_realistic: &str,
    original: &str,
    buggy: &str,
) -> MutantSpec {
    MutantSpec {
        problem_id: problem_id.to_string(),
        bug_type: bug_type.to_string(),
        description: description.to_string(),
        why_realistic: why_realistic.to_string(),
        original_fragment: original.to_string(),
        buggy_fragment: buggy.to_string(),
    }
}

/// Bugs for HumanEval/10 (`make_palindrome`).
fn palindrome_specs() -> Vec<MutantSpec> {
    vec![
        spec(
            "HumanEval/10",
            "off_by_one",
            "Off-by-one error: loop stops one iteration early",
            "Common mistake when converting between inclusive and exclusive ranges",
            "for i in range(len(string)):",
            "for i in range(len(string) - 1):",
        ),
        spec(
            "HumanEval/10",
            "wrong_boundary",
            "Boundary error: skips checking from position i",
            "Common indexing mistake when slicing strings",
            "if is_palindrome(string[i:]):",
            "if is_palindrome(string[i+1:]):",
        ),
        spec(
            "HumanEval/10",
            "reversed_logic",
            "Logic error: prepends instead of appends the reversed prefix",
            "Common confusion about palindrome construction direction",
            "return string + string[:i][::-1]",
            "return string[:i][::-1] + string",
        ),
        spec(
            "HumanEval/10",
            "missing_empty_check",
            "Exception handling error: returns \"ERROR\" for the empty string",
            "Overzealous input validation breaking edge case handling",
            "def make_palindrome(string: str) -> str:\n    if is_palindrome(string):",
            "def make_palindrome(string: str) -> str:\n    if len(string) == 0:\n        return \"ERROR\"\n    if is_palindrome(string):",
        ),
        spec(
            "HumanEval/10",
            "wrong_slice",
            "Slice error: reverses the wrong portion of the string",
            "Common confusion about which part needs reversal",
            "return string + string[:i][::-1]",
            "return string + string[i:][::-1]",
        ),
    ]
}

/// Bugs for HumanEval/20 (`find_closest_elements`).
fn closest_elements_specs() -> Vec<MutantSpec> {
    vec![
        spec(
            "HumanEval/20",
            "comparison_operator",
            "Comparison error: uses <= instead of < for the distance check",
            "Common mistake causing incorrect pair selection when distances are equal",
            "if new_distance < distance:",
            "if new_distance <= distance:",
        ),
        spec(
            "HumanEval/20",
            "missing_self_check",
            "Logic error: skips valid pairs with the same value",
            "Incorrectly filters out identical numbers at different positions",
            "if idx != idx2:",
            "if idx != idx2 and elem != elem2:",
        ),
        spec(
            "HumanEval/20",
            "wrong_sort",
            "Sorting error: returns the pair unsorted",
            "Forgets the requirement to return the smaller number first",
            "closest_pair = tuple(sorted([elem, elem2]))",
            "closest_pair = (elem, elem2)",
        ),
        spec(
            "HumanEval/20",
            "initialization_error",
            "Initialization error: uses inf instead of None",
            "Different initialization strategy breaking the None-check logic",
            "distance = None",
            "distance = float(\"inf\")",
        ),
        spec(
            "HumanEval/20",
            "index_start",
            "Indexing error: starts enumeration at 1 instead of 0",
            "Common mistake when wanting 1-indexed positions",
            "for idx, elem in enumerate(numbers):",
            "for idx, elem in enumerate(numbers, 1):",
        ),
    ]
}

/// Applies catalog specs to concrete solution text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BugInjector;

impl BugInjector {
    /// Construct the mutant for one spec: exactly one substring replacement
    /// of the original fragment with the buggy fragment.
    ///
    /// The catalog is tied to one exact solution's formatting. A fragment
    /// that is not found verbatim means this mutant cannot be generated for
    /// this solution variant; the caller excludes it from the detection
    /// denominator.
    pub fn create_mutant(spec: &MutantSpec, solution: &Solution) -> AmplifyResult<Mutant> {
        if !solution.source.contains(&spec.original_fragment) {
            warn!(
                problem_id = %spec.problem_id,
                bug_type = %spec.bug_type,
                "original fragment not found in solution source"
            );
            return Err(AmplifyError::MutationNotApplicable {
                problem_id: spec.problem_id.clone(),
                bug_type: spec.bug_type.clone(),
            });
        }

        let source = solution
            .source
            .replacen(&spec.original_fragment, &spec.buggy_fragment, 1);

        Ok(Mutant {
            bug_type: spec.bug_type.clone(),
            description: spec.description.clone(),
            why_realistic: spec.why_realistic.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALINDROME_SOLUTION: &str = "\
def is_palindrome(string: str) -> bool:
    return string == string[::-1]

def make_palindrome(string: str) -> str:
    if is_palindrome(string):
        return string
    for i in range(len(string)):
        if is_palindrome(string[i:]):
            return string + string[:i][::-1]
    return string
";

    fn solution() -> Solution {
        Solution::new(PALINDROME_SOLUTION, "gpt4o", "cot")
    }

    #[test]
    fn test_builtin_catalog_has_five_bugs_per_problem() {
        let catalog = MutantCatalog::builtin();
        assert_eq!(catalog.mutants_for("HumanEval/10").unwrap().len(), 5);
        assert_eq!(catalog.mutants_for("HumanEval/20").unwrap().len(), 5);
        assert!(catalog.mutants_for("HumanEval/99").is_none());
    }

    #[test]
    fn test_create_mutant_replaces_single_fragment() {
        let catalog = MutantCatalog::builtin();
        let spec = catalog.spec("HumanEval/10", "reversed_logic").unwrap();
        let mutant = BugInjector::create_mutant(spec, &solution()).unwrap();

        assert!(mutant.source.contains("return string[:i][::-1] + string"));
        assert!(!mutant.source.contains("return string + string[:i][::-1]"));
        // Everything else is untouched.
        assert!(mutant.source.contains("for i in range(len(string)):"));
    }

    #[test]
    fn test_missing_fragment_is_not_applicable() {
        let catalog = MutantCatalog::builtin();
        let spec = catalog.spec("HumanEval/10", "off_by_one").unwrap();
        let reformatted = Solution::new(
            // Same logic, different formatting: the catalog fragment is absent.
            "def make_palindrome(string):\n    for i in range(0, len(string)):\n        pass\n",
            "gpt4o",
            "cot",
        );

        let err = BugInjector::create_mutant(spec, &reformatted).unwrap_err();
        assert!(matches!(
            err,
            AmplifyError::MutationNotApplicable { ref bug_type, .. } if bug_type == "off_by_one"
        ));
    }

    #[test]
    fn test_replacement_happens_once() {
        let spec = spec(
            "HumanEval/10",
            "repeat",
            "desc",
            "rationale",
            "return string",
            "return None",
        );
        let mutant = BugInjector::create_mutant(&spec, &solution()).unwrap();
        // Only the first occurrence is replaced.
        assert_eq!(mutant.source.matches("return None").count(), 1);
    }
}
