//! Structured outcome of a synchronization run.
//!
//! A run never aborts half-way: each step either succeeds, succeeds with
//! dropped input lines, or fails and lets the next step work with whatever is on
//! disk. These types make that outcome visible to the caller instead of only in
//! the log.

use crate::processing::humidity::HumidityStats;
use crate::processing::merger::MergeStats;
use crate::processing::sanitizer::SanitizeStats;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// Step completed and every input line was used.
    Success,
    /// Step completed but dropped `warnings` malformed inputs.
    Partial { warnings: usize },
    /// Step did not produce its output. `error` holds the full error chain.
    Failed { error: String },
}

impl StepStatus {
    pub fn from_warnings(warnings: usize) -> Self {
        if warnings == 0 {
            StepStatus::Success
        } else {
            StepStatus::Partial { warnings }
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        StepStatus::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepStatus::Success)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed { .. })
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepStatus::Success => write!(f, "ok"),
            StepStatus::Partial { warnings: 1 } => write!(f, "ok with 1 warning"),
            StepStatus::Partial { warnings } => write!(f, "ok with {} warnings", warnings),
            StepStatus::Failed { error } => write!(f, "failed ({})", error),
        }
    }
}

/// Outcome of one coordinate's fetch → aggregate → merge sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReport {
    pub id: String,
    pub output_path: PathBuf,
    pub fetch: StepStatus,
    pub aggregate: StepStatus,
    pub merge: StepStatus,
    pub humidity: Option<HumidityStats>,
    pub merged: Option<MergeStats>,
}

impl PointReport {
    /// True when no step failed. A failed fetch makes the output suspect even if
    /// the later steps succeeded on stale staging files.
    pub fn is_usable(&self) -> bool {
        !(self.fetch.is_failed() || self.aggregate.is_failed() || self.merge.is_failed())
    }

    fn steps(&self) -> [&StepStatus; 3] {
        [&self.fetch, &self.aggregate, &self.merge]
    }
}

/// Outcome of a whole synchronization: every point plus the final sanitizer pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub points: Vec<PointReport>,
    pub sanitize: StepStatus,
    pub sanitized: Option<SanitizeStats>,
}

impl SyncReport {
    /// True only if every step of every point, and the sanitizer, fully succeeded.
    pub fn is_success(&self) -> bool {
        self.sanitize.is_success()
            && self
                .points
                .iter()
                .all(|p| p.steps().iter().all(|s| s.is_success()))
    }

    pub fn has_failures(&self) -> bool {
        self.sanitize.is_failed() || self.points.iter().any(|p| !p.is_usable())
    }

    pub fn failed_points(&self) -> impl Iterator<Item = &PointReport> {
        self.points.iter().filter(|p| !p.is_usable())
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data synchronization completed.")?;
        for point in &self.points {
            writeln!(
                f,
                "  {}: fetch {}, aggregate {}, merge {} -> {}",
                point.id,
                point.fetch,
                point.aggregate,
                point.merge,
                point.output_path.display()
            )?;
        }
        match &self.sanitized {
            Some(stats) => write!(
                f,
                "  sanitize: {} ({} files, {} rewritten)",
                self.sanitize, stats.files_scanned, stats.files_rewritten
            ),
            None => write!(f, "  sanitize: {}", self.sanitize),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(fetch: StepStatus, merge: StepStatus) -> PointReport {
        PointReport {
            id: "p1".to_string(),
            output_path: PathBuf::from("weather-files/p1.WTH"),
            fetch,
            aggregate: StepStatus::Success,
            merge,
            humidity: None,
            merged: None,
        }
    }

    #[test]
    fn test_from_warnings() {
        assert_eq!(StepStatus::from_warnings(0), StepStatus::Success);
        assert_eq!(
            StepStatus::from_warnings(4),
            StepStatus::Partial { warnings: 4 }
        );
    }

    #[test]
    fn test_partial_is_not_success_but_not_failure() {
        let report = SyncReport {
            points: vec![point(StepStatus::Success, StepStatus::from_warnings(2))],
            sanitize: StepStatus::Success,
            sanitized: None,
        };
        assert!(!report.is_success());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_failed_fetch_marks_point_unusable() {
        let report = SyncReport {
            points: vec![
                point(StepStatus::failed("connection refused"), StepStatus::Success),
                point(StepStatus::Success, StepStatus::Success),
            ],
            sanitize: StepStatus::Success,
            sanitized: None,
        };
        assert!(report.has_failures());
        assert_eq!(report.failed_points().count(), 1);
    }

    #[test]
    fn test_summary_starts_with_completion_message() {
        let report = SyncReport {
            points: vec![point(StepStatus::Success, StepStatus::Success)],
            sanitize: StepStatus::Success,
            sanitized: Some(SanitizeStats {
                files_scanned: 2,
                files_rewritten: 1,
                replacements: 1,
                failures: 0,
            }),
        };
        let text = report.to_string();
        assert!(text.starts_with("Data synchronization completed.\n"));
        assert!(text.contains("p1: fetch ok, aggregate ok, merge ok"));
        assert!(text.ends_with("sanitize: ok (2 files, 1 rewritten)"));
    }

    #[test]
    fn test_serializes_status_tag() {
        let json = serde_json::to_string(&StepStatus::Partial { warnings: 3 }).unwrap();
        assert_eq!(json, r#"{"status":"partial","warnings":3}"#);
    }
}
