//! Sequential ingestion: spreadsheet rows → sink, one row at a time.
//!
//! Each row is written end-to-end before the next one starts. Nothing spans
//! rows, so an aborted run leaves every earlier row committed.

use serde::{Deserialize, Serialize};

use qagraph_core::QaPair;
use qagraph_graph::GraphError;

use crate::config::RetryPolicy;
use crate::error::{IngestError, Result};
use crate::sheet::SheetData;
use crate::sink::QaSink;

/// A row the store rejected while `continue_on_error` was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub line: usize,
    pub error: String,
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Data records in the file.
    pub total: usize,
    pub merged: usize,
    /// Records dropped for a blank question or answer.
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

/// Write every row of `data` into `sink`.
///
/// Connectivity errors are retried per `policy`; once retries run out the run
/// aborts with [`IngestError::Aborted`]. Other write errors abort too unless
/// `policy.continue_on_error` is set, in which case they are recorded in the
/// summary.
pub async fn ingest<S: QaSink>(
    sink: &mut S,
    data: &SheetData,
    policy: &RetryPolicy,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary {
        total: data.total,
        skipped: data.skipped.len(),
        ..Default::default()
    };

    for row in &data.rows {
        match write_with_retry(sink, &row.pair, policy, row.line).await {
            Ok(()) => {
                summary.merged += 1;
                tracing::debug!(line = row.line, "Row merged");
            }
            Err(e) if !e.is_transient() && policy.continue_on_error => {
                tracing::warn!(line = row.line, error = %e, "Row rejected, continuing");
                summary.failures.push(RowFailure {
                    line: row.line,
                    error: e.to_string(),
                });
            }
            Err(e) => {
                tracing::error!(
                    line = row.line,
                    merged = summary.merged,
                    error = %e,
                    "Ingestion aborted"
                );
                return Err(IngestError::Aborted {
                    line: row.line,
                    merged: summary.merged,
                    source: e,
                });
            }
        }
    }

    tracing::info!(
        source = %data.source.display(),
        total = summary.total,
        merged = summary.merged,
        skipped = summary.skipped,
        failed = summary.failures.len(),
        "Ingestion complete"
    );

    Ok(summary)
}

async fn write_with_retry<S: QaSink>(
    sink: &mut S,
    pair: &QaPair,
    policy: &RetryPolicy,
    line: usize,
) -> std::result::Result<(), GraphError> {
    let mut attempt = 0;
    loop {
        match sink.merge_pair(pair).await {
            Ok(()) => return Ok(()),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    line,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient write failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
