//! Tamper-evident run reports.
//!
//! Every ingestion run can leave a JSON record of what it read and wrote.
//! The record is content-hashed with BLAKE3 on finalization; loading a report
//! whose content no longer matches its hash fails.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::{IngestSummary, RowFailure};
use crate::sheet::SheetData;

/// Errors that can occur while storing or loading reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Integrity check failed for report {0}: stored hash does not match content")]
    IntegrityViolation(Uuid),

    #[error("Report has no content hash (not finalized)")]
    NotFinalized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    Aborted { line: Option<usize>, error: String },
}

/// Record of one ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub id: Uuid,
    pub source: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total: usize,
    pub merged: usize,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
    pub outcome: RunOutcome,
    /// BLAKE3 content hash (hex), set by [`IngestReport::finalize`].
    pub content_hash: Option<String>,
}

/// Hashable view of a report (excludes `content_hash`).
#[derive(Serialize)]
struct HashableReport<'a> {
    id: &'a Uuid,
    source: &'a Path,
    dry_run: bool,
    started_at: &'a DateTime<Utc>,
    completed_at: &'a Option<DateTime<Utc>>,
    total: usize,
    merged: usize,
    skipped: usize,
    failures: &'a [RowFailure],
    outcome: &'a RunOutcome,
}

impl IngestReport {
    /// Start a report for a run reading `source`.
    pub fn start(source: &Path, dry_run: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.to_path_buf(),
            dry_run,
            started_at: Utc::now(),
            completed_at: None,
            total: 0,
            merged: 0,
            skipped: 0,
            failures: Vec::new(),
            outcome: RunOutcome::Completed,
            content_hash: None,
        }
    }

    /// Copy the read-side counts, known before any write is attempted.
    pub fn record_sheet(&mut self, data: &SheetData) {
        self.total = data.total;
        self.skipped = data.skipped.len();
    }

    /// Copy counts from a finished run.
    pub fn record_summary(&mut self, summary: &IngestSummary) {
        self.total = summary.total;
        self.merged = summary.merged;
        self.skipped = summary.skipped;
        self.failures = summary.failures.clone();
        self.outcome = RunOutcome::Completed;
    }

    /// Mark the run as aborted.
    pub fn record_abort(&mut self, line: Option<usize>, merged: usize, error: &str) {
        self.merged = merged;
        self.outcome = RunOutcome::Aborted {
            line,
            error: error.to_string(),
        };
    }

    /// Set `completed_at` and compute the content hash.
    pub fn finalize(mut self) -> Self {
        self.completed_at = Some(Utc::now());
        self.content_hash = Some(self.compute_hash());
        self
    }

    /// BLAKE3 hash over every field except `content_hash`.
    pub fn compute_hash(&self) -> String {
        let hashable = HashableReport {
            id: &self.id,
            source: &self.source,
            dry_run: self.dry_run,
            started_at: &self.started_at,
            completed_at: &self.completed_at,
            total: self.total,
            merged: self.merged,
            skipped: self.skipped,
            failures: &self.failures,
            outcome: &self.outcome,
        };
        let json = serde_json::to_vec(&hashable).unwrap_or_default();
        blake3::hash(&json).to_hex().to_string()
    }

    /// Whether the stored hash matches the content.
    pub fn verify_integrity(&self) -> bool {
        match &self.content_hash {
            Some(stored) => stored == &self.compute_hash(),
            None => false,
        }
    }

    /// Write the finalized report under `root/YYYY/MM/DD/<id>.json`.
    /// Returns the path written.
    pub fn save(&self, root: &Path) -> Result<PathBuf, ReportError> {
        if self.content_hash.is_none() {
            return Err(ReportError::NotFinalized);
        }

        let date = self.started_at.format("%Y/%m/%d");
        let path = root.join(format!("{}/{}.json", date, self.id));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        tracing::debug!(report_id = %self.id, path = %path.display(), "Report saved");
        Ok(path)
    }

    /// Read a report back, verifying its hash.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = fs::read_to_string(path)?;
        let report: IngestReport = serde_json::from_str(&json)?;
        if !report.verify_integrity() {
            return Err(ReportError::IntegrityViolation(report.id));
        }
        Ok(report)
    }
}
