//! Reading real `.xlsx` workbooks.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;

use qagraph_ingest::{IngestConfig, IngestError, SheetReader};

/// Two sheets: "FAQ" (header on row 3, after two empty rows) and "Archive".
fn write_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("qa.xlsx");
    let mut workbook = Workbook::new();

    let faq = workbook.add_worksheet();
    faq.set_name("FAQ").unwrap();
    faq.write_string(2, 0, "Question Text").unwrap();
    faq.write_string(2, 1, "answerText").unwrap();
    faq.write_string(3, 0, "What is anxiety?").unwrap();
    faq.write_string(3, 1, "A feeling of worry.").unwrap();
    faq.write_number(4, 0, 42.0).unwrap();
    faq.write_number(4, 1, 1.5).unwrap();
    faq.write_string(5, 0, "Unanswered").unwrap();
    faq.write_string(6, 0, "How can I sleep better?").unwrap();
    faq.write_string(6, 1, "  Keep a regular schedule. ").unwrap();

    let archive = workbook.add_worksheet();
    archive.set_name("Archive").unwrap();
    archive.write_string(0, 0, "questionText").unwrap();
    archive.write_string(0, 1, "answerText").unwrap();
    archive.write_string(1, 0, "Old question?").unwrap();
    archive.write_string(1, 1, "Old answer.").unwrap();

    workbook.save(&path).unwrap();
    path
}

fn reader_for(sheet: Option<&str>) -> SheetReader {
    SheetReader::new(&IngestConfig {
        sheet: sheet.map(str::to_string),
        ..Default::default()
    })
}

#[test]
fn test_reads_first_sheet_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(dir.path());

    let data = reader_for(None).read(&path).unwrap();

    assert_eq!(data.total, 4);
    assert_eq!(data.rows.len(), 3);
    assert_eq!(data.skipped, vec![6]);

    let lines: Vec<usize> = data.rows.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![4, 5, 7]);

    assert_eq!(data.rows[0].pair.question(), "What is anxiety?");
    assert_eq!(data.rows[1].pair.question(), "42");
    assert_eq!(data.rows[1].pair.answer(), "1.5");
    assert_eq!(data.rows[2].pair.answer(), "Keep a regular schedule.");
}

#[test]
fn test_reads_named_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(dir.path());

    let data = reader_for(Some("Archive")).read(&path).unwrap();

    assert_eq!(data.total, 1);
    assert_eq!(data.rows[0].line, 2);
    assert_eq!(data.rows[0].pair.question(), "Old question?");
    assert_eq!(data.rows[0].pair.answer(), "Old answer.");
}

#[test]
fn test_unknown_sheet_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_workbook(dir.path());

    let err = reader_for(Some("Missing")).read(&path).unwrap_err();

    assert!(err.is_configuration());
    match err {
        IngestError::SheetNotFound(name) => assert_eq!(name, "Missing"),
        other => panic!("unexpected error: {other}"),
    }
}
