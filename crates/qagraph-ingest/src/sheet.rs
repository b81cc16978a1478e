//! Spreadsheet reading.
//!
//! Loads a workbook (`calamine`) or CSV file (`csv`), locates the question
//! and answer columns by normalized header name, and turns every record into
//! a [`QaPair`]. Records whose question or answer is blank after trimming are
//! dropped and counted, never raised.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use qagraph_core::QaPair;

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};

/// Workbook extensions handled by calamine.
const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// One usable record, with its 1-based line in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub line: usize,
    pub pair: QaPair,
}

/// Everything read from one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub source: PathBuf,
    /// Records that produced a valid pair, in file order.
    pub rows: Vec<SheetRow>,
    /// Lines dropped because the question or answer was blank.
    pub skipped: Vec<usize>,
    /// Data records seen, excluding the header.
    pub total: usize,
}

/// Reads question/answer spreadsheets according to an [`IngestConfig`].
#[derive(Debug, Clone)]
pub struct SheetReader {
    question_column: String,
    answer_column: String,
    sheet: Option<String>,
}

impl SheetReader {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            question_column: config.question_column.clone(),
            answer_column: config.answer_column.clone(),
            sheet: config.sheet.clone(),
        }
    }

    /// Read and validate the file at `path`.
    ///
    /// Fails with [`IngestError::MissingColumn`] if either required column is
    /// absent; this happens before any row is returned.
    pub fn read(&self, path: &Path) -> Result<SheetData> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        tracing::info!(path = %path.display(), format = %ext, "Loading spreadsheet");

        let data = if ext == "csv" {
            self.read_csv(path)?
        } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            self.read_workbook(path)?
        } else {
            return Err(IngestError::UnsupportedFormat(path.display().to_string()));
        };

        tracing::info!(
            path = %path.display(),
            total = data.total,
            usable = data.rows.len(),
            skipped = data.skipped.len(),
            "Spreadsheet loaded"
        );
        Ok(data)
    }

    fn read_csv(&self, path: &Path) -> Result<SheetData> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        // The reader's own position survives multi-line fields and blank lines.
        let records = reader.records().map(|r| -> Result<(usize, Vec<String>)> {
            let record = r?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or_default();
            Ok((line, record.iter().map(str::to_string).collect()))
        });

        self.collect_rows(path, header, records)
    }

    fn read_workbook(&self, path: &Path) -> Result<SheetData> {
        let mut workbook = open_workbook_auto(path)?;
        let names = workbook.sheet_names();

        let name = match &self.sheet {
            Some(wanted) => names
                .iter()
                .find(|n| *n == wanted)
                .cloned()
                .ok_or_else(|| IngestError::SheetNotFound(wanted.clone()))?,
            None => names
                .first()
                .cloned()
                .ok_or_else(|| IngestError::EmptySheet(path.display().to_string()))?,
        };
        tracing::debug!(sheet = %name, "Reading worksheet");

        let range = workbook.worksheet_range(&name)?;
        let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

        let mut rows = range.rows();
        let header: Vec<String> = match rows.next() {
            Some(cells) => cells.iter().map(cell_text).collect(),
            None => Vec::new(),
        };
        let records = rows
            .enumerate()
            .map(|(i, cells)| -> Result<(usize, Vec<String>)> {
                Ok((first_line + i + 1, cells.iter().map(cell_text).collect()))
            });

        self.collect_rows(path, header, records)
    }

    /// Validate the header and turn records into pairs.
    ///
    /// Each record arrives with its 1-based line in the source file.
    fn collect_rows<I>(&self, path: &Path, header: Vec<String>, records: I) -> Result<SheetData>
    where
        I: IntoIterator<Item = Result<(usize, Vec<String>)>>,
    {
        if header.iter().all(|h| h.trim().is_empty()) {
            return Err(IngestError::EmptySheet(path.display().to_string()));
        }

        let q_idx = find_column(&header, &self.question_column)?;
        let a_idx = find_column(&header, &self.answer_column)?;

        let mut data = SheetData {
            source: path.to_path_buf(),
            rows: Vec::new(),
            skipped: Vec::new(),
            total: 0,
        };

        for record in records {
            let (line, record) = record?;
            data.total += 1;

            let question = record.get(q_idx).map(String::as_str).unwrap_or("");
            let answer = record.get(a_idx).map(String::as_str).unwrap_or("");

            match QaPair::new(question, answer) {
                Some(pair) => data.rows.push(SheetRow { line, pair }),
                None => {
                    tracing::debug!(line, "Skipping row with blank question or answer");
                    data.skipped.push(line);
                }
            }
        }

        Ok(data)
    }
}

/// Lowercase and strip all whitespace, so `" Question Text "` and
/// `questiontext` compare equal.
pub fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Index of the first header matching `wanted` after normalization.
fn find_column(header: &[String], wanted: &str) -> Result<usize> {
    let target = normalize_header(wanted);
    header
        .iter()
        .position(|h| normalize_header(h) == target)
        .ok_or_else(|| IngestError::MissingColumn {
            column: wanted.to_string(),
        })
}

/// Text of a workbook cell. Empty and error cells read as blank.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
