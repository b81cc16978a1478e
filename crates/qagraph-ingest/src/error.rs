//! Error types for the qagraph-ingest crate.

use thiserror::Error;

use qagraph_graph::GraphError;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Spreadsheet is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    #[error("Worksheet '{0}' not found")]
    SheetNotFound(String),

    #[error("Spreadsheet has no header row: {0}")]
    EmptySheet(String),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Ingestion aborted at line {line} after {merged} merged rows: {source}")]
    Aborted {
        line: usize,
        merged: usize,
        #[source]
        source: GraphError,
    },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Config error: {0}")]
    Config(#[from] qagraph_core::QaGraphError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Configuration-class errors are raised before any write happens.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::UnsupportedFormat(_)
                | Self::SheetNotFound(_)
                | Self::EmptySheet(_)
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
