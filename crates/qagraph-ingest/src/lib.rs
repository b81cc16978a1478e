//! qagraph-ingest: spreadsheet ingestion for the question/answer graph.
//!
//! Reads question/answer rows from a spreadsheet, validates the required
//! columns, and merges every usable row into Neo4j one at a time. Each run
//! can leave a tamper-evident report.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sheet;
pub mod sink;

pub use config::{IngestConfig, RetryPolicy};
pub use error::{IngestError, Result};
pub use pipeline::{ingest, IngestSummary};
pub use sheet::{SheetData, SheetReader};
pub use sink::{MemorySink, QaSink};
