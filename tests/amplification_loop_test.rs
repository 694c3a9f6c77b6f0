//! Integration tests for the amplification loop state machine.
//!
//! These drive the orchestrator end to end through scripted generator and
//! bench doubles: termination on full coverage, on convergence, on the
//! iteration cap, on zero new tests, and the failure semantics that keep a
//! partial report available.

mod common;

use std::sync::Arc;

use covforge::application::AmplificationOrchestrator;
use covforge::domain::errors::AmplifyError;
use covforge::domain::models::AmplifierConfig;
use covforge::domain::ports::{GeneratorError, RunnerError};

use common::{batch, measurement, palindrome_problem, palindrome_solution, ScriptedGenerator, ScriptedBench};

const BASELINE_SUITE: &str = "def test_baseline(solution_function):\n    assert solution_function('') == ''\n";

fn orchestrator(
    generator: ScriptedGenerator,
    bench: ScriptedBench,
    config: AmplifierConfig,
) -> (
    AmplificationOrchestrator<ScriptedGenerator, ScriptedBench>,
    Arc<ScriptedGenerator>,
    Arc<ScriptedBench>,
) {
    let generator = Arc::new(generator);
    let bench = Arc::new(bench);
    (
        AmplificationOrchestrator::new(Arc::clone(&generator), Arc::clone(&bench), config),
        generator,
        bench,
    )
}

#[tokio::test]
async fn full_coverage_baseline_skips_generation() {
    let generator = ScriptedGenerator::new(vec![]);
    let bench = ScriptedBench::new(vec![Ok(measurement(100.0, 4))]);
    let (orchestrator, generator, bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.report.total_iterations, 0);
    assert!(!outcome.report.converged);
    assert_eq!(outcome.report.iterations.len(), 1);
    assert_eq!(generator.call_count(), 0);
    assert_eq!(bench.measure_call_count(), 1);
}

#[tokio::test]
async fn all_duplicate_batch_halts_without_measuring() {
    let generator = ScriptedGenerator::new(vec![
        Ok(batch(&["test_alpha", "test_beta"])),
        // Second batch collides entirely with the first.
        Ok(batch(&["test_alpha", "test_beta"])),
    ]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(50.0, 1)),
        Ok(measurement(60.0, 3)),
    ]);
    let (orchestrator, generator, bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    assert!(outcome.is_complete());
    // Baseline + iteration 1 were measured; the colliding iteration 2 was not.
    assert_eq!(bench.measure_call_count(), 2);
    assert_eq!(generator.call_count(), 2);
    assert_eq!(outcome.report.total_iterations, 1);
    assert_eq!(outcome.report.iterations.last().unwrap().new_tests_added, 2);
}

#[tokio::test]
async fn plateau_in_trailing_window_converges() {
    // Trajectory [10, 50, 80, 81, 82, 83]: last four snapshots are flat
    // under the 2-apart rule, so iteration 5 converges.
    let generator = ScriptedGenerator::new(vec![
        Ok(batch(&["test_a1"])),
        Ok(batch(&["test_a2"])),
        Ok(batch(&["test_a3"])),
        Ok(batch(&["test_a4"])),
        Ok(batch(&["test_a5"])),
    ]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(10.0, 1)),
        Ok(measurement(50.0, 2)),
        Ok(measurement(80.0, 3)),
        Ok(measurement(81.0, 4)),
        Ok(measurement(82.0, 5)),
        Ok(measurement(83.0, 6)),
    ]);
    let (orchestrator, generator, _bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    assert!(outcome.is_complete());
    assert!(outcome.report.converged);
    assert_eq!(outcome.report.total_iterations, 5);
    assert_eq!(generator.call_count(), 5);

    let branches: Vec<f64> = outcome
        .report
        .iterations
        .iter()
        .map(|record| record.branch_coverage)
        .collect();
    assert_eq!(branches, vec![10.0, 50.0, 80.0, 81.0, 82.0, 83.0]);
    assert!((outcome.report.total_improvement.branch - 73.0).abs() < 1e-9);
}

#[tokio::test]
async fn iteration_cap_halts_an_improving_run() {
    let config = AmplifierConfig {
        max_iterations: 2,
        ..AmplifierConfig::default()
    };
    let generator = ScriptedGenerator::new(vec![
        Ok(batch(&["test_b1"])),
        Ok(batch(&["test_b2"])),
        // Never requested: the cap stops the loop first.
        Ok(batch(&["test_b3"])),
    ]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(10.0, 1)),
        Ok(measurement(40.0, 2)),
        Ok(measurement(70.0, 3)),
    ]);
    let (orchestrator, generator, _bench) = orchestrator(generator, bench, config);

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.report.total_iterations, 2);
    assert_eq!(generator.call_count(), 2);
    assert!(!outcome.report.converged);
}

#[tokio::test]
async fn full_coverage_mid_loop_stops_generation() {
    let generator = ScriptedGenerator::new(vec![Ok(batch(&["test_c1"]))]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(50.0, 1)),
        Ok(measurement(100.0, 5)),
    ]);
    let (orchestrator, generator, _bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.report.total_iterations, 1);
    assert_eq!(generator.call_count(), 1);
    assert!((outcome.report.final_coverage.branch - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn generator_failure_preserves_partial_report() {
    let generator = ScriptedGenerator::new(vec![
        Ok(batch(&["test_d1"])),
        Err(GeneratorError::Provider("rate limited".into())),
    ]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(20.0, 1)),
        Ok(measurement(40.0, 2)),
    ]);
    let (orchestrator, _generator, _bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    let failure = outcome.failure.expect("run should have failed");
    assert_eq!(failure.iteration(), Some(2));
    assert!(matches!(failure, AmplifyError::Generator { .. }));
    // The trajectory collected before the failure is intact.
    assert_eq!(outcome.report.iterations.len(), 2);
    assert_eq!(outcome.report.total_iterations, 1);
}

#[tokio::test]
async fn runner_failure_surfaces_iteration_and_cause() {
    let generator = ScriptedGenerator::new(vec![Ok(batch(&["test_e1"]))]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(20.0, 1)),
        Err(RunnerError::Timeout { seconds: 30 }),
    ]);
    let (orchestrator, _generator, _bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    let failure = outcome.failure.expect("run should have failed");
    assert_eq!(failure.iteration(), Some(1));
    assert!(failure.to_string().contains("30s timeout"));
    assert_eq!(outcome.report.iterations.len(), 1);
}

#[tokio::test]
async fn suite_grows_monotonically_across_iterations() {
    let generator = ScriptedGenerator::new(vec![
        Ok(batch(&["test_f1"])),
        Ok(batch(&["test_f2"])),
        Ok(batch(&["test_f2", "test_f3"])),
        Ok(batch(&["test_f3"])),
    ]);
    let bench = ScriptedBench::new(vec![
        Ok(measurement(10.0, 1)),
        Ok(measurement(30.0, 2)),
        Ok(measurement(50.0, 3)),
        Ok(measurement(70.0, 4)),
    ]);
    let (orchestrator, _generator, bench) =
        orchestrator(generator, bench, AmplifierConfig::default());

    let outcome = orchestrator
        .amplify(&palindrome_problem(), &palindrome_solution(), BASELINE_SUITE)
        .await;

    assert!(outcome.is_complete());
    // Fourth batch collided entirely, so the loop stopped after three measures
    // plus the baseline.
    let suites = bench.seen_suites();
    assert_eq!(suites.len(), 4);
    for window in suites.windows(2) {
        assert!(window[1].len() >= window[0].len());
        assert!(window[1].starts_with(&window[0]));
    }
    // The duplicate-bearing third batch only contributed its novel test.
    let record = &outcome.report.iterations[3];
    assert_eq!(record.new_tests_added, 1);
    assert_eq!(record.duplicates_removed, 1);
    for name in ["test_baseline", "test_f1", "test_f2", "test_f3"] {
        assert!(outcome.report.final_suite.contains(&format!("def {name}(")));
    }
}
