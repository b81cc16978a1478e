//! Configuration for the qagraph-ingest tool.

use std::time::Duration;

use serde::Deserialize;

/// Top-level ingest configuration.
///
/// Loaded from the `qagraph.toml` `[ingest]` section or
/// `QAGRAPH__INGEST__` environment variables. CLI flags override both.
/// Retry keys sit directly in the section; [`IngestConfig::retry_policy`]
/// groups them for the pipeline.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IngestConfig {
    /// Header of the question column, matched ignoring case and whitespace.
    #[serde(default = "default_question_column")]
    pub question_column: String,

    /// Header of the answer column, matched ignoring case and whitespace.
    #[serde(default = "default_answer_column")]
    pub answer_column: String,

    /// Worksheet to read; the first sheet when unset. Ignored for CSV.
    #[serde(default)]
    pub sheet: Option<String>,

    /// Create uniqueness constraints on Question/Answer text before writing.
    ///
    /// Off by default: the backing index caps key size, so text longer than
    /// the store's index key limit (about 8 KB) is rejected once it is on.
    #[serde(default)]
    pub ensure_constraints: bool,

    /// Extra attempts for connectivity failures before aborting the run.
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Record rows the store rejects and keep going instead of aborting.
    #[serde(default)]
    pub continue_on_error: bool,

    /// Directory for run reports; no report is written when unset.
    #[serde(default)]
    pub report_dir: Option<String>,
}

impl IngestConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.initial_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
            continue_on_error: self.continue_on_error,
        }
    }
}

/// How the pipeline reacts to failed writes.
///
/// The defaults make any write failure fatal with no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub continue_on_error: bool,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): doubles each time,
    /// capped at `max_backoff_ms`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        let ms = self
            .initial_backoff_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_backoff_ms);
        Duration::from_millis(ms)
    }
}

fn default_question_column() -> String {
    "questionText".to_string()
}

fn default_answer_column() -> String {
    "answerText".to_string()
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            continue_on_error: false,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            question_column: default_question_column(),
            answer_column: default_answer_column(),
            sheet: None,
            ensure_constraints: false,
            max_retries: 0,
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            continue_on_error: false,
            report_dir: None,
        }
    }
}
