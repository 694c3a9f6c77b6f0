//! Batch runner.
//!
//! Problems are independent: each one owns its accumulator, trajectory, and
//! mutant set, so a batch processes them in parallel across tokio tasks with
//! no shared mutable state. One problem's failure never blocks the others,
//! and every problem always yields a persisted report artifact, even a
//! degenerate one.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, warn};

use crate::domain::errors::AmplifyError;
use crate::domain::models::{
    AmplificationReport, FaultDetectionReport, Problem, Solution,
};
use crate::domain::ports::{TestBench, TestCandidateGenerator};
use crate::infrastructure::reports::ReportStore;
use crate::services::fault_detection::FaultDetectionEvaluator;

use super::orchestrator::AmplificationOrchestrator;

/// One problem's inputs: the problem, the solution variant under test, and
/// the fixed baseline suite.
#[derive(Debug, Clone)]
pub struct ProblemRun {
    /// The benchmark problem.
    pub problem: Problem,
    /// The candidate solution to amplify tests for.
    pub solution: Solution,
    /// The fixed starting suite measured as iteration 0.
    pub baseline_suite: String,
}

/// Everything one problem produced, errors included.
#[derive(Debug)]
pub struct ProblemOutcome {
    /// Problem this outcome belongs to.
    pub problem_id: String,
    /// The amplification report (always present, possibly partial).
    pub amplification: AmplificationReport,
    /// The fault-detection report, when the run completed and the catalog
    /// has mutants for the problem.
    pub fault_detection: Option<FaultDetectionReport>,
    /// Description of the failure that halted this problem, if any.
    pub error: Option<String>,
}

/// Runs a batch of independent problems through both engines.
pub struct BatchRunner<G: TestCandidateGenerator + 'static, B: TestBench + 'static> {
    orchestrator: Arc<AmplificationOrchestrator<G, B>>,
    evaluator: Arc<FaultDetectionEvaluator<B>>,
    store: Arc<ReportStore>,
}

impl<G: TestCandidateGenerator + 'static, B: TestBench + 'static> BatchRunner<G, B> {
    /// Create a batch runner with the given engines and report store.
    pub fn new(
        orchestrator: Arc<AmplificationOrchestrator<G, B>>,
        evaluator: Arc<FaultDetectionEvaluator<B>>,
        store: Arc<ReportStore>,
    ) -> Self {
        Self {
            orchestrator,
            evaluator,
            store,
        }
    }

    /// Process every problem, in parallel, isolating failures per problem.
    ///
    /// Outcomes are returned in input order.
    pub async fn run(&self, runs: Vec<ProblemRun>) -> Vec<ProblemOutcome> {
        let handles: Vec<_> = runs
            .into_iter()
            .map(|run| {
                let orchestrator = Arc::clone(&self.orchestrator);
                let evaluator = Arc::clone(&self.evaluator);
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    process_problem(run, &orchestrator, &evaluator, &store).await
                })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in join_all(handles).await {
            match handle {
                Ok(outcome) => outcomes.push(outcome),
                Err(join_error) => {
                    // A panicked task loses its outcome; surface the panic
                    // without aborting the rest of the batch.
                    error!(error = %join_error, "problem task panicked");
                }
            }
        }
        outcomes
    }
}

/// Amplify one problem, persist its reports, and evaluate fault detection.
async fn process_problem<G: TestCandidateGenerator, B: TestBench>(
    run: ProblemRun,
    orchestrator: &AmplificationOrchestrator<G, B>,
    evaluator: &FaultDetectionEvaluator<B>,
    store: &ReportStore,
) -> ProblemOutcome {
    let problem_id = run.problem.problem_id.clone();

    let outcome = orchestrator
        .amplify(&run.problem, &run.solution, &run.baseline_suite)
        .await;

    if let Err(persist_error) = store.save_amplification(&outcome.report).await {
        error!(%problem_id, error = %persist_error, "failed to persist amplification report");
    }

    let mut error = outcome.failure.as_ref().map(ToString::to_string);

    let fault_detection = if outcome.is_complete() {
        match evaluator
            .evaluate(&run.problem, &run.solution, &outcome.report.final_suite)
            .await
        {
            Ok(report) => {
                if let Err(persist_error) = store.save_fault_detection(&report).await {
                    error!(%problem_id, error = %persist_error, "failed to persist fault-detection report");
                }
                info!(
                    %problem_id,
                    detection_rate = report.detection_rate,
                    "fault detection complete"
                );
                Some(report)
            }
            Err(AmplifyError::NoMutantsForProblem(_)) => {
                warn!(%problem_id, "no mutants cataloged; skipping fault detection");
                None
            }
            Err(other) => {
                error = Some(other.to_string());
                None
            }
        }
    } else {
        None
    };

    ProblemOutcome {
        problem_id,
        amplification: outcome.report,
        fault_detection,
        error,
    }
}
