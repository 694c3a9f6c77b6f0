//! Pytest-backed execution bench.
//!
//! Materializes a suite run into a scratch directory keyed by
//! `(problem, label)`, shells out to `python -m pytest` via tokio, and
//! parses the pass/fail counts and the coverage JSON back into domain
//! measurements. The target module is loaded through a generated conftest
//! that exposes a single `solution_function` fixture, so the suite never
//! references a filesystem path: rebinding a suite to a mutant is just
//! materializing the same suite next to a different target source.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tokio::fs;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::domain::models::coverage::round2;
use crate::domain::models::RunnerConfig;
use crate::domain::ports::{
    CoverageMeasurement, RunnerError, SuiteOutcome, SuiteRun, TestBench,
};

/// Filename the target source is materialized under.
const TARGET_FILE: &str = "solution_under_test.py";
/// Filename the suite is materialized under.
const SUITE_FILE: &str = "test_suite.py";
/// Filename of the generated coverage report.
const COVERAGE_FILE: &str = "coverage.json";

static PASSED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) passed").expect("static regex"));
static FAILED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) failed").expect("static regex"));
static FAILED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"FAILED[^:\n]*::(test_\w+)").expect("static regex"));

/// Executes suites through pytest with optional coverage instrumentation.
pub struct PytestBench {
    config: RunnerConfig,
}

impl PytestBench {
    /// Create a bench over the given runner configuration.
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Write the run's sources and harness conftest into its scratch
    /// directory. Each `(problem, label)` pair gets a distinct directory, so
    /// concurrent runs never clobber each other.
    async fn materialize(&self, run: &SuiteRun) -> Result<PathBuf, RunnerError> {
        let dir = self
            .config
            .scratch_dir
            .join(&run.problem_slug)
            .join(&run.label);
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(TARGET_FILE), &run.target_source).await?;
        fs::write(dir.join(SUITE_FILE), &run.suite_source).await?;
        fs::write(dir.join("conftest.py"), conftest_source(&run.entry_point)).await?;
        Ok(dir)
    }

    /// Launch pytest in the run directory with the given extra arguments.
    async fn run_pytest(
        &self,
        dir: &Path,
        extra_args: &[String],
        timeout_seconds: u64,
    ) -> Result<std::process::Output, RunnerError> {
        let mut command = Command::new(&self.config.python);
        command
            .current_dir(dir)
            .arg("-m")
            .arg("pytest")
            .arg(SUITE_FILE)
            .arg("--tb=short")
            .arg("--disable-warnings")
            .args(extra_args)
            .kill_on_drop(true);

        debug!(dir = %dir.display(), ?extra_args, "launching pytest");

        let output = timeout(Duration::from_secs(timeout_seconds), command.output())
            .await
            .map_err(|_| RunnerError::Timeout {
                seconds: timeout_seconds,
            })?
            .map_err(|e| RunnerError::ExecutionFailed(format!("failed to launch pytest: {e}")))?;

        Ok(output)
    }
}

#[async_trait]
impl TestBench for PytestBench {
    async fn measure(&self, run: &SuiteRun) -> Result<CoverageMeasurement, RunnerError> {
        let dir = self.materialize(run).await?;
        let coverage_path = dir.join(COVERAGE_FILE);

        let args = vec![
            format!("--cov={}", dir.display()),
            "--cov-branch".to_string(),
            "--cov-report=term".to_string(),
            format!("--cov-report=json:{}", coverage_path.display()),
            "-q".to_string(),
        ];
        let output = self
            .run_pytest(&dir, &args, self.config.run_timeout_seconds)
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (tests_passed, tests_failed) = parse_pass_fail(&stdout);

        let json = fs::read_to_string(&coverage_path).await.map_err(|_| {
            RunnerError::ExecutionFailed(format!(
                "coverage JSON not generated; pytest stderr: {}",
                String::from_utf8_lossy(&output.stderr)
            ))
        })?;
        let coverage: serde_json::Value = json.parse::<serde_json::Value>().map_err(|e| {
            RunnerError::ExecutionFailed(format!("unreadable coverage JSON: {e}"))
        })?;

        let mut measurement = extract_target_coverage(&coverage, TARGET_FILE)?;
        measurement.tests_passed = tests_passed;
        measurement.tests_failed = tests_failed;
        Ok(measurement)
    }

    async fn execute(&self, run: &SuiteRun) -> Result<SuiteOutcome, RunnerError> {
        let dir = self.materialize(run).await?;
        let args = vec!["-v".to_string()];
        let output = self
            .run_pytest(&dir, &args, self.config.evaluation_timeout_seconds)
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (tests_passed, tests_failed) = parse_pass_fail(&stdout);
        Ok(SuiteOutcome {
            tests_passed,
            tests_failed,
            failed_test_names: parse_failed_names(&stdout),
        })
    }
}

/// Parse the pytest summary's passed/failed counts.
fn parse_pass_fail(stdout: &str) -> (u32, u32) {
    let passed = PASSED_COUNT
        .captures(stdout)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    let failed = FAILED_COUNT
        .captures(stdout)
        .and_then(|c| c[1].parse().ok())
        .unwrap_or(0);
    (passed, failed)
}

/// Parse the names of failing tests from verbose pytest output.
fn parse_failed_names(stdout: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in FAILED_NAME.captures_iter(stdout) {
        let name = captures[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Locate the target file's entry in the coverage JSON and project its
/// summary into a measurement. A missing entry is a
/// `RunnerError::CoverageMissing` listing the files that are present.
fn extract_target_coverage(
    coverage: &serde_json::Value,
    target_file: &str,
) -> Result<CoverageMeasurement, RunnerError> {
    let files = coverage
        .get("files")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| {
            RunnerError::ExecutionFailed("coverage JSON has no files table".to_string())
        })?;

    for (path, data) in files {
        if !path.ends_with(target_file) && !path.contains(target_file) {
            continue;
        }
        let summary = data.get("summary").ok_or_else(|| {
            RunnerError::ExecutionFailed(format!("coverage entry for {path} has no summary"))
        })?;

        let as_u32 = |key: &str| -> u32 {
            summary
                .get(key)
                .and_then(serde_json::Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0)
        };
        let branches_covered = as_u32("covered_branches");
        let branches_total = as_u32("num_branches");
        let branch_coverage = if branches_total == 0 {
            0.0
        } else {
            round2(f64::from(branches_covered) / f64::from(branches_total) * 100.0)
        };
        let line_coverage = round2(
            summary
                .get("percent_covered")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0),
        );

        return Ok(CoverageMeasurement {
            line_coverage,
            branch_coverage,
            lines_covered: as_u32("covered_lines"),
            lines_total: as_u32("num_statements"),
            branches_covered,
            branches_total,
            tests_passed: 0,
            tests_failed: 0,
        });
    }

    Err(RunnerError::CoverageMissing {
        target: target_file.to_string(),
        available: files.keys().cloned().collect(),
    })
}

/// The generated conftest: loads the target module once and exposes its
/// entry point as a stable callable fixture. The suite only ever depends on
/// `solution_function`, never on the target's location.
fn conftest_source(entry_point: &str) -> String {
    format!(
        r#"import importlib.util
from pathlib import Path

import pytest

_TARGET = Path(__file__).parent / "{TARGET_FILE}"


def _load_target():
    spec = importlib.util.spec_from_file_location("solution_under_test", _TARGET)
    module = importlib.util.module_from_spec(spec)
    spec.loader.exec_module(module)
    return module


_MODULE = _load_target()


@pytest.fixture
def solution_function():
    return getattr(_MODULE, "{entry_point}")
"#
    )
}
