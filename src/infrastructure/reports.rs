//! Report persistence.
//!
//! Every run always yields a report artifact on disk, even a degenerate
//! one-iteration report, so downstream comparison tooling never needs to
//! special-case "no data".

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::domain::models::{AmplificationReport, FaultDetectionReport};

/// Writes report artifacts as pretty-printed JSON under a report directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    report_dir: PathBuf,
}

impl ReportStore {
    /// Create a store rooted at the given directory.
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    /// Directory the store writes into.
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Persist one amplification report as `report_<problem>.json`.
    pub async fn save_amplification(&self, report: &AmplificationReport) -> Result<PathBuf> {
        let path = self
            .report_dir
            .join(format!("report_{}.json", slug(&report.problem_id)));
        self.write_json(&path, report).await?;
        Ok(path)
    }

    /// Persist one fault-detection report as `fault_detection_<problem>.json`.
    pub async fn save_fault_detection(&self, report: &FaultDetectionReport) -> Result<PathBuf> {
        let path = self
            .report_dir
            .join(format!("fault_detection_{}.json", slug(&report.problem_id)));
        self.write_json(&path, report).await?;
        Ok(path)
    }

    async fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.report_dir)
            .await
            .context("Failed to create report directory")?;
        let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
        fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        debug!(path = %path.display(), "report persisted");
        Ok(())
    }
}

fn slug(problem_id: &str) -> String {
    problem_id.replace(['/', '\\', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::models::CoveragePair;

    #[tokio::test]
    async fn test_amplification_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReportStore::new(dir.path());

        let report = AmplificationReport {
            run_id: Uuid::new_v4(),
            problem_id: "HumanEval/10".into(),
            baseline_coverage: CoveragePair { line: 80.0, branch: 50.0 },
            final_coverage: CoveragePair { line: 100.0, branch: 95.0 },
            total_improvement: CoveragePair { line: 20.0, branch: 45.0 },
            total_iterations: 3,
            converged: false,
            iterations: Vec::new(),
            final_suite: "# suite".into(),
            generated_at: Utc::now(),
        };

        let path = store.save_amplification(&report).await.unwrap();
        assert!(path.ends_with("report_HumanEval_10.json"));

        let json = tokio::fs::read_to_string(&path).await.unwrap();
        let back: AmplificationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
