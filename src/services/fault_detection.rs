//! Fault-detection evaluator.
//!
//! Runs the frozen, amplified suite unchanged against each cataloged mutant
//! of a problem and records a detected/missed verdict per mutant. The suite
//! is shared read-only across mutant runs; each run gets a distinct bench
//! label so scratch locations never collide.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::errors::{AmplifyError, AmplifyResult};
use crate::domain::models::coverage::round2;
use crate::domain::models::{
    DetectionResult, FaultDetectionReport, Mutant, MutantVerdict, NotApplicable, Problem,
    Solution,
};
use crate::domain::ports::{SuiteRun, TestBench};
use crate::services::mutation::{BugInjector, MutantCatalog};

/// Evaluates a frozen suite against every mutant of a problem.
pub struct FaultDetectionEvaluator<B: TestBench> {
    bench: Arc<B>,
    catalog: MutantCatalog,
}

impl<B: TestBench> FaultDetectionEvaluator<B> {
    /// Create an evaluator over the given bench and catalog.
    pub fn new(bench: Arc<B>, catalog: MutantCatalog) -> Self {
        Self { bench, catalog }
    }

    /// Evaluate every cataloged mutant for the problem.
    ///
    /// Mutants whose fragment is absent from this solution variant are
    /// reported separately as not applicable and excluded from the
    /// denominator. A mutant run that fails (e.g. times out) is recorded on
    /// the verdict and counts as not detected; there are no retries.
    pub async fn evaluate(
        &self,
        problem: &Problem,
        solution: &Solution,
        frozen_suite: &str,
    ) -> AmplifyResult<FaultDetectionReport> {
        let specs = self
            .catalog
            .mutants_for(&problem.problem_id)
            .ok_or_else(|| AmplifyError::NoMutantsForProblem(problem.problem_id.clone()))?;

        let mut results: Vec<DetectionResult> = Vec::new();
        let mut not_applicable: Vec<NotApplicable> = Vec::new();

        for spec in specs {
            match BugInjector::create_mutant(spec, solution) {
                Ok(mutant) => {
                    let result = self.run_mutant(problem, &mutant, frozen_suite).await;
                    if result.detected {
                        info!(
                            problem_id = %problem.problem_id,
                            bug_type = %result.bug_type,
                            tests_failed = result.tests_failed,
                            "bug detected"
                        );
                    } else {
                        info!(
                            problem_id = %problem.problem_id,
                            bug_type = %result.bug_type,
                            "bug missed"
                        );
                    }
                    results.push(result);
                }
                Err(err) => {
                    not_applicable.push(NotApplicable {
                        bug_type: spec.bug_type.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(build_report(&problem.problem_id, results, not_applicable))
    }

    /// Execute the suite against one mutant, pass/fail only.
    async fn run_mutant(
        &self,
        problem: &Problem,
        mutant: &Mutant,
        frozen_suite: &str,
    ) -> DetectionResult {
        let run = SuiteRun {
            problem_slug: problem.slug(),
            label: format!("bug_{}", mutant.bug_type),
            suite_source: frozen_suite.to_string(),
            target_source: mutant.source.clone(),
            entry_point: problem.entry_point.clone(),
        };

        match self.bench.execute(&run).await {
            Ok(outcome) => DetectionResult {
                bug_type: mutant.bug_type.clone(),
                description: mutant.description.clone(),
                why_realistic: mutant.why_realistic.clone(),
                detected: outcome.any_failed(),
                tests_passed: outcome.tests_passed,
                tests_failed: outcome.tests_failed,
                failed_test_names: outcome.failed_test_names,
                execution_error: None,
            },
            Err(err) => {
                warn!(
                    problem_id = %problem.problem_id,
                    bug_type = %mutant.bug_type,
                    error = %err,
                    "mutant evaluation run failed; recording as not detected"
                );
                DetectionResult {
                    bug_type: mutant.bug_type.clone(),
                    description: mutant.description.clone(),
                    why_realistic: mutant.why_realistic.clone(),
                    detected: false,
                    tests_passed: 0,
                    tests_failed: 0,
                    failed_test_names: Vec::new(),
                    execution_error: Some(err.to_string()),
                }
            }
        }
    }
}

/// Aggregate per-mutant results into the problem's report.
fn build_report(
    problem_id: &str,
    results: Vec<DetectionResult>,
    not_applicable: Vec<NotApplicable>,
) -> FaultDetectionReport {
    let total = results.len();
    let detected = results.iter().filter(|result| result.detected).count();
    let detection_rate = if total == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        round2(detected as f64 / total as f64 * 100.0)
    };

    FaultDetectionReport {
        problem_id: problem_id.to_string(),
        total_bugs_injected: total,
        bugs_detected: detected,
        bugs_missed: total - detected,
        detection_rate,
        mutants: results.iter().map(MutantVerdict::from).collect(),
        not_applicable,
        generated_at: Utc::now(),
    }
}
