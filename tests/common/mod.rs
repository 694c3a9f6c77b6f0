//! In-memory port doubles shared by the integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use covforge::domain::ports::{
    CoverageMeasurement, GeneratorError, PromptPayload, RunnerError, SuiteOutcome, SuiteRun,
    TestBench, TestCandidateGenerator,
};
use covforge::domain::models::{Problem, Solution};

/// Generator double that replays a scripted sequence of responses.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<Result<String, GeneratorError>>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(responses: Vec<Result<String, GeneratorError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TestCandidateGenerator for ScriptedGenerator {
    async fn generate(&self, _payload: &PromptPayload) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GeneratorError::Provider("script exhausted".into())))
    }
}

/// Bench double: scripted coverage measurements for `measure`, per-label
/// outcomes for `execute`.
#[derive(Default)]
pub struct ScriptedBench {
    measurements: Mutex<VecDeque<Result<CoverageMeasurement, RunnerError>>>,
    outcomes: Mutex<HashMap<String, Result<SuiteOutcome, RunnerError>>>,
    measure_calls: AtomicUsize,
    seen_suites: Mutex<Vec<String>>,
    execute_labels: Mutex<Vec<String>>,
}

impl ScriptedBench {
    pub fn new(measurements: Vec<Result<CoverageMeasurement, RunnerError>>) -> Self {
        Self {
            measurements: Mutex::new(measurements.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Script the outcome `execute` returns for a given run label.
    pub fn script_outcome(&self, label: &str, outcome: Result<SuiteOutcome, RunnerError>) {
        self.outcomes.lock().unwrap().insert(label.to_string(), outcome);
    }

    pub fn measure_call_count(&self) -> usize {
        self.measure_calls.load(Ordering::SeqCst)
    }

    /// Suites passed to `measure`, in call order.
    pub fn seen_suites(&self) -> Vec<String> {
        self.seen_suites.lock().unwrap().clone()
    }

    /// Labels passed to `execute`, in call order.
    pub fn execute_labels(&self) -> Vec<String> {
        self.execute_labels.lock().unwrap().clone()
    }
}

#[async_trait]
impl TestBench for ScriptedBench {
    async fn measure(&self, run: &SuiteRun) -> Result<CoverageMeasurement, RunnerError> {
        self.measure_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_suites.lock().unwrap().push(run.suite_source.clone());
        self.measurements
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(RunnerError::ExecutionFailed(
                    "measurement script exhausted".into(),
                ))
            })
    }

    async fn execute(&self, run: &SuiteRun) -> Result<SuiteOutcome, RunnerError> {
        self.execute_labels.lock().unwrap().push(run.label.clone());
        match self.outcomes.lock().unwrap().remove(&run.label) {
            Some(outcome) => outcome,
            // Unscripted mutants survive: every test passes.
            None => Ok(SuiteOutcome {
                tests_passed: 5,
                tests_failed: 0,
                failed_test_names: Vec::new(),
            }),
        }
    }
}

/// A measurement with the given branch coverage out of 10 branches.
pub fn measurement(branch_coverage: f64, tests_passed: u32) -> CoverageMeasurement {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let branches_covered = (branch_coverage / 10.0).round() as u32;
    CoverageMeasurement {
        line_coverage: branch_coverage,
        branch_coverage,
        lines_covered: tests_passed,
        lines_total: 20,
        branches_covered,
        branches_total: 10,
        tests_passed,
        tests_failed: 0,
    }
}

/// The palindrome problem used throughout the scenarios.
pub fn palindrome_problem() -> Problem {
    Problem::new(
        "HumanEval/10",
        "make_palindrome",
        "Find the shortest palindrome that begins with a supplied string.",
        "def make_palindrome(string: str) -> str",
    )
}

/// A solution whose text matches the built-in mutant catalog fragments.
pub fn palindrome_solution() -> Solution {
    Solution::new(
        "\
def is_palindrome(string: str) -> bool:
    return string == string[::-1]

def make_palindrome(string: str) -> str:
    if is_palindrome(string):
        return string
    for i in range(len(string)):
        if is_palindrome(string[i:]):
            return string + string[:i][::-1]
    return string
",
        "gpt4o",
        "cot",
    )
}

/// A candidate batch declaring the given test names.
pub fn batch(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("def {name}(solution_function):\n    assert solution_function('') == ''\n"))
        .collect::<Vec<_>>()
        .join("\n")
}
