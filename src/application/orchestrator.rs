//! Amplification orchestrator.
//!
//! Drives one problem's coverage-guided loop through its phases:
//!
//! `Baseline -> Generating -> Merging -> Measuring -> Checking -> {Generating | Done}`
//!
//! The loop terminates on full branch coverage, on convergence, on the
//! iteration cap, or when a merge accepts zero new tests. A generator or
//! bench error is fatal to the run, but the snapshots and records collected
//! before the failure are preserved so the run still yields a report.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::AmplifyError;
use crate::domain::models::coverage::round2;
use crate::domain::models::{
    AmplificationReport, AmplifierConfig, CoveragePair, CoverageSnapshot, IterationRecord,
    Problem, Solution,
};
use crate::domain::ports::{
    CoverageMeasurement, SuiteRun, TestBench, TestCandidateGenerator,
};
use crate::services::accumulator::TestSuiteAccumulator;
use crate::services::convergence::ConvergenceDetector;
use crate::services::{candidate, prompt};

/// Phase of the loop state machine, for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Baseline,
    Generating,
    Merging,
    Measuring,
    Checking,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Baseline => "baseline",
            Self::Generating => "generating",
            Self::Merging => "merging",
            Self::Measuring => "measuring",
            Self::Checking => "checking",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of one problem's amplification run.
///
/// A report is always present, even for a failed run; `failure` carries the
/// iteration-scoped error when the loop halted abnormally.
#[derive(Debug)]
pub struct AmplificationOutcome {
    /// The run's report, possibly partial.
    pub report: AmplificationReport,
    /// The error that halted the loop, if any.
    pub failure: Option<AmplifyError>,
}

impl AmplificationOutcome {
    /// Whether the run completed without an iteration-level error.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Drives the coverage-guided amplification loop for single problems.
///
/// Generic over the generator and bench ports following the codebase
/// pattern; holds no per-problem state, so one orchestrator can serve many
/// concurrent problem runs.
pub struct AmplificationOrchestrator<G: TestCandidateGenerator, B: TestBench> {
    generator: Arc<G>,
    bench: Arc<B>,
    config: AmplifierConfig,
}

impl<G: TestCandidateGenerator, B: TestBench> AmplificationOrchestrator<G, B> {
    /// Create an orchestrator with the given dependencies.
    pub fn new(generator: Arc<G>, bench: Arc<B>, config: AmplifierConfig) -> Self {
        Self {
            generator,
            bench,
            config,
        }
    }

    /// Run the full amplification loop for one problem.
    ///
    /// `baseline_suite` is the fixed starting suite (e.g. the dataset's
    /// canonical tests); it is measured as iteration 0 and every accepted
    /// group is appended after it, never edited.
    pub async fn amplify(
        &self,
        problem: &Problem,
        solution: &Solution,
        baseline_suite: &str,
    ) -> AmplificationOutcome {
        let run_id = Uuid::new_v4();
        info!(%run_id, problem_id = %problem.problem_id, "starting amplification run");

        let detector = ConvergenceDetector::from_config(&self.config);
        let mut accumulator = TestSuiteAccumulator::with_baseline(baseline_suite);
        let mut trajectory: Vec<CoverageSnapshot> = Vec::new();
        let mut records: Vec<IterationRecord> = Vec::new();

        // -- BASELINE --
        debug!(phase = %Phase::Baseline, "measuring baseline suite");
        let baseline = match self
            .measure(problem, solution, &accumulator, 0)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(failure) => {
                return self.finish(
                    run_id,
                    problem,
                    &accumulator,
                    &detector,
                    trajectory,
                    records,
                    Some(failure),
                );
            }
        };
        records.push(IterationRecord::new(&baseline, 0, 0));
        trajectory.push(baseline.clone());

        if baseline.is_full_branch_coverage() {
            // Nothing left to cover; the generator is never invoked.
            info!(problem_id = %problem.problem_id, "baseline already at full branch coverage");
            return self.finish(
                run_id, problem, &accumulator, &detector, trajectory, records, None,
            );
        }

        for iteration in 1..=self.config.max_iterations {
            // -- GENERATING --
            debug!(phase = %Phase::Generating, iteration, "requesting candidate tests");
            let latest = trajectory.last().expect("baseline snapshot exists");
            let payload = prompt::build_payload(
                iteration,
                problem,
                solution,
                latest,
                accumulator.group_count(),
            );
            let raw = match self.generator.generate(&payload).await {
                Ok(raw) => raw,
                Err(source) => {
                    warn!(iteration, error = %source, "generator failed");
                    return self.finish(
                        run_id,
                        problem,
                        &accumulator,
                        &detector,
                        trajectory,
                        records,
                        Some(AmplifyError::Generator { iteration, source }),
                    );
                }
            };

            // -- MERGING --
            debug!(phase = %Phase::Merging, iteration, "merging candidate batch");
            let cleaned = candidate::sanitize(&raw, &problem.entry_point);
            let merge = accumulator.merge(&cleaned, iteration);
            if merge.accepted == 0 {
                // No forward progress possible; skip the measuring step.
                info!(
                    iteration,
                    duplicates = merge.duplicates,
                    "no new tests accepted; halting loop"
                );
                break;
            }

            // -- MEASURING --
            debug!(phase = %Phase::Measuring, iteration, "measuring merged suite");
            let snapshot = match self
                .measure(problem, solution, &accumulator, iteration)
                .await
            {
                Ok(snapshot) => snapshot,
                Err(failure) => {
                    return self.finish(
                        run_id,
                        problem,
                        &accumulator,
                        &detector,
                        trajectory,
                        records,
                        Some(failure),
                    );
                }
            };
            records.push(IterationRecord::new(&snapshot, merge.accepted, merge.duplicates));
            trajectory.push(snapshot.clone());

            // -- CHECKING --
            debug!(phase = %Phase::Checking, iteration, branch = snapshot.branch_coverage);
            if snapshot.is_full_branch_coverage() {
                info!(iteration, "full branch coverage reached");
                break;
            }
            if detector.check(&trajectory) {
                info!(iteration, "coverage trajectory converged");
                break;
            }
        }

        self.finish(
            run_id, problem, &accumulator, &detector, trajectory, records, None,
        )
    }

    /// Materialize the suite and run one instrumented measurement.
    async fn measure(
        &self,
        problem: &Problem,
        solution: &Solution,
        accumulator: &TestSuiteAccumulator,
        iteration: u32,
    ) -> Result<CoverageSnapshot, AmplifyError> {
        let run = SuiteRun {
            problem_slug: problem.slug(),
            label: format!("iter{iteration}"),
            suite_source: accumulator.materialize(),
            target_source: solution.source.clone(),
            entry_point: problem.entry_point.clone(),
        };
        let measurement = self
            .bench
            .measure(&run)
            .await
            .map_err(|source| AmplifyError::Runner { iteration, source })?;
        Ok(snapshot_from(iteration, &measurement))
    }

    /// Assemble the final report.
    #[allow(clippy::too_many_arguments)]
    fn finish(
        &self,
        run_id: Uuid,
        problem: &Problem,
        accumulator: &TestSuiteAccumulator,
        detector: &ConvergenceDetector,
        trajectory: Vec<CoverageSnapshot>,
        records: Vec<IterationRecord>,
        failure: Option<AmplifyError>,
    ) -> AmplificationOutcome {
        debug!(phase = %Phase::Done, problem_id = %problem.problem_id);

        let baseline_coverage = trajectory
            .first()
            .map_or(CoveragePair { line: 0.0, branch: 0.0 }, CoveragePair::from_snapshot);
        let final_coverage = trajectory
            .last()
            .map_or(baseline_coverage, CoveragePair::from_snapshot);
        let converged = detector.check(&trajectory);
        let total_iterations = u32::try_from(trajectory.len().saturating_sub(1)).unwrap_or(0);

        let report = AmplificationReport {
            run_id,
            problem_id: problem.problem_id.clone(),
            baseline_coverage,
            final_coverage,
            total_improvement: CoveragePair {
                line: round2(final_coverage.line - baseline_coverage.line),
                branch: round2(final_coverage.branch - baseline_coverage.branch),
            },
            total_iterations,
            converged,
            iterations: records,
            final_suite: accumulator.materialize(),
            generated_at: Utc::now(),
        };

        info!(
            %run_id,
            problem_id = %problem.problem_id,
            total_iterations,
            converged,
            final_branch = final_coverage.branch,
            failed = failure.is_some(),
            "amplification run finished"
        );

        AmplificationOutcome { report, failure }
    }
}

/// Build the iteration snapshot from a bench measurement.
fn snapshot_from(iteration: u32, measurement: &CoverageMeasurement) -> CoverageSnapshot {
    CoverageSnapshot {
        iteration,
        line_coverage: measurement.line_coverage,
        branch_coverage: measurement.branch_coverage,
        lines_covered: measurement.lines_covered,
        lines_total: measurement.lines_total,
        branches_covered: measurement.branches_covered,
        branches_total: measurement.branches_total,
        tests_passed: measurement.tests_passed,
        tests_failed: measurement.tests_failed,
    }
}
