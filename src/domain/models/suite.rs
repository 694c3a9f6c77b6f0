//! Accumulated-suite building blocks.
//!
//! The accumulator itself lives in the service layer; these are the data
//! types it is built from.

use serde::{Deserialize, Serialize};

/// One self-contained test case accepted into the accumulated suite.
///
/// Names are unique within an accumulator and a unit is never removed once
/// accepted (append-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestUnit {
    /// Unique test function name, e.g. "test_make_palindrome_empty".
    pub name: String,
    /// Iteration at which this unit was accepted.
    pub iteration: u32,
}

/// The accepted text of one merge, tagged with its iteration.
///
/// Groups are concatenated in iteration order when the suite is
/// materialized; their text is never edited after acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationGroup {
    /// Iteration at which this group was accepted.
    pub iteration: u32,
    /// Surviving candidate text, with colliding units already removed.
    pub text: String,
    /// Names of the test units this group contributed.
    pub names: Vec<String>,
}

/// Result of merging one raw candidate batch into the accumulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Candidate text with every colliding unit dropped in its entirety.
    /// Empty when every candidate collided.
    pub accepted_text: String,
    /// Test units accepted from this batch.
    pub accepted: usize,
    /// Test units dropped because their name was already accumulated.
    pub duplicates: usize,
}

impl MergeOutcome {
    /// Total candidates seen in the batch: accepted + duplicates.
    pub fn candidate_count(&self) -> usize {
        self.accepted + self.duplicates
    }
}
