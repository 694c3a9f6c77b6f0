//! Append-only test suite accumulator.
//!
//! The accumulator owns the suite exclusively; the orchestrator is its only
//! writer. It grows monotonically across merges, never shrinks, and resolves
//! name collisions by dropping the whole incoming unit, never by renaming or
//! overwriting.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::models::{IterationGroup, MergeOutcome, TestUnit};

/// Matches a top-level test function declaration at the start of a line.
static TEST_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^def (test_\w+)\s*\(").expect("static regex"));

/// Ordered, append-only collection of accepted test units.
///
/// Insertion order equals iteration order; accepted text is grouped by
/// iteration for reporting and never edited after acceptance.
#[derive(Debug, Clone, Default)]
pub struct TestSuiteAccumulator {
    baseline: String,
    groups: Vec<IterationGroup>,
    units: Vec<TestUnit>,
    names: BTreeSet<String>,
}

impl TestSuiteAccumulator {
    /// Create an empty accumulator with no baseline suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator seeded with a fixed baseline suite.
    ///
    /// Baseline test names participate in deduplication: a candidate that
    /// collides with a baseline test is dropped like any other duplicate.
    pub fn with_baseline(baseline: impl Into<String>) -> Self {
        let baseline = baseline.into();
        let names = Self::extract_candidate_names(&baseline);
        let units = names
            .iter()
            .map(|name| TestUnit {
                name: name.clone(),
                iteration: 0,
            })
            .collect();
        Self {
            baseline,
            groups: Vec::new(),
            units,
            names,
        }
    }

    /// Parse top-level test function names syntactically from raw candidate
    /// text. Declaration pattern only; nothing is executed.
    pub fn extract_candidate_names(raw: &str) -> BTreeSet<String> {
        TEST_DEF
            .captures_iter(raw)
            .map(|captures| captures[1].to_string())
            .collect()
    }

    /// Merge a raw candidate batch into the suite.
    ///
    /// Every candidate whose name is already accumulated is dropped in its
    /// entirety (signature through body). The surviving text is appended as
    /// a new iteration group. A batch with no test declarations, or whose
    /// every candidate collides, accepts nothing and adds no group.
    pub fn merge(&mut self, raw: &str, iteration: u32) -> MergeOutcome {
        let candidate_names = Self::extract_candidate_names(raw);
        if candidate_names.is_empty() {
            debug!(iteration, "candidate batch contains no test declarations");
            return MergeOutcome {
                accepted_text: String::new(),
                accepted: 0,
                duplicates: 0,
            };
        }

        let duplicates: BTreeSet<String> = candidate_names
            .intersection(&self.names)
            .cloned()
            .collect();
        let accepted_names: Vec<String> = candidate_names
            .difference(&duplicates)
            .cloned()
            .collect();

        if accepted_names.is_empty() {
            debug!(
                iteration,
                duplicates = duplicates.len(),
                "every candidate collided with an accumulated name"
            );
            return MergeOutcome {
                accepted_text: String::new(),
                accepted: 0,
                duplicates: duplicates.len(),
            };
        }

        let accepted_text = if duplicates.is_empty() {
            raw.to_string()
        } else {
            strip_colliding_units(raw, &duplicates)
        };

        for name in &accepted_names {
            self.units.push(TestUnit {
                name: name.clone(),
                iteration,
            });
            self.names.insert(name.clone());
        }
        self.groups.push(IterationGroup {
            iteration,
            text: accepted_text.clone(),
            names: accepted_names.clone(),
        });

        debug!(
            iteration,
            accepted = accepted_names.len(),
            duplicates = duplicates.len(),
            "merged candidate batch"
        );

        MergeOutcome {
            accepted_text,
            accepted: accepted_names.len(),
            duplicates: duplicates.len(),
        }
    }

    /// Concatenate the baseline and every accepted group, in iteration
    /// order, into one executable module.
    ///
    /// Idempotent: consecutive calls with no intervening merge yield
    /// byte-identical output.
    pub fn materialize(&self) -> String {
        let mut module = self.baseline.clone();
        if self.groups.is_empty() {
            return module;
        }
        module.push_str("\n\n# Generated tests (accumulated)\n");
        for group in &self.groups {
            let _ = write!(module, "\n# --- Iteration {} tests ---\n\n", group.iteration);
            module.push_str(&group.text);
            module.push('\n');
        }
        module
    }

    /// Names of every accumulated test, in deterministic order.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }

    /// Accepted units in insertion order, including baseline units.
    pub fn units(&self) -> &[TestUnit] {
        &self.units
    }

    /// Accepted iteration groups, oldest first.
    pub fn groups(&self) -> &[IterationGroup] {
        &self.groups
    }

    /// Number of accepted candidate batches.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

/// Remove every colliding test function, whole body included, from a
/// candidate batch.
///
/// Line walk: a line declaring a duplicate starts a skip region that runs
/// until the next top-level test declaration.
fn strip_colliding_units(raw: &str, duplicates: &BTreeSet<String>) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut skipping = false;

    for line in raw.lines() {
        if let Some(captures) = TEST_DEF.captures(line) {
            skipping = duplicates.contains(&captures[1]);
            if skipping {
                continue;
            }
        }
        if !skipping {
            kept.push(line);
        }
    }

    kept.join("\n")
}
