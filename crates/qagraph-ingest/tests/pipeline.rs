//! End-to-end ingestion from CSV files into the in-memory sink.

use std::path::{Path, PathBuf};

use qagraph_graph::GraphStats;
use qagraph_ingest::report::{IngestReport, RunOutcome};
use qagraph_ingest::{ingest, IngestConfig, IngestError, MemorySink, RetryPolicy, SheetReader};

fn write_csv(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_ingest_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "qa.csv",
        "Question Text,ANSWERTEXT,category\n\
         What is anxiety?,A feeling of worry.,basics\n\
         What is anxiety?,A feeling of worry.,basics\n\
         How can I sleep better?,Keep a regular schedule.,sleep\n\
         How can I sleep better?,Avoid screens late.,sleep\n\
         ,orphan answer,misc\n\
         Unanswered question,  ,misc\n",
    );

    let data = SheetReader::new(&IngestConfig::default())
        .read(&path)
        .unwrap();
    assert_eq!(data.total, 6);
    assert_eq!(data.rows.len(), 4);
    assert_eq!(data.skipped, vec![6, 7]);

    let mut sink = MemorySink::new();
    let summary = ingest(&mut sink, &data, &RetryPolicy::default())
        .await
        .unwrap();

    assert_eq!(summary.merged, 4);
    assert_eq!(summary.skipped, 2);
    assert!(summary.failures.is_empty());
    assert_eq!(
        sink.stats(),
        GraphStats {
            questions: 2,
            answers: 3,
            has_answer: 3,
        }
    );
    assert_eq!(
        sink.answers_for("How can I sleep better?"),
        vec!["Avoid screens late.", "Keep a regular schedule."]
    );
}

#[tokio::test]
async fn test_reingesting_same_file_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "qa.csv",
        "questionText,answerText\nWhat is X?,X is Y.\nWhat is X?,X is Y.\nWhat is Z?,X is Y.\n",
    );
    let reader = SheetReader::new(&IngestConfig::default());
    let mut sink = MemorySink::new();

    let data = reader.read(&path).unwrap();
    ingest(&mut sink, &data, &RetryPolicy::default())
        .await
        .unwrap();
    let first = sink.stats();

    let data = reader.read(&path).unwrap();
    ingest(&mut sink, &data, &RetryPolicy::default())
        .await
        .unwrap();

    assert_eq!(sink.stats(), first);
    assert_eq!(first.questions, 2);
    assert_eq!(first.answers, 1);
    assert_eq!(first.has_answer, 2);
}

#[test]
fn test_missing_column_fails_before_any_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "qa.csv",
        "questionText,reply\nWhat is X?,X is Y.\n",
    );

    let err = SheetReader::new(&IngestConfig::default())
        .read(&path)
        .unwrap_err();

    assert!(err.is_configuration());
    match err {
        IngestError::MissingColumn { column } => assert_eq!(column, "answerText"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_report_for_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "qa.csv",
        "questionText,answerText\nWhat is X?,X is Y.\n  ,answer\n",
    );
    let data = SheetReader::new(&IngestConfig::default())
        .read(&path)
        .unwrap();

    let mut report = IngestReport::start(&path, true);
    let summary = ingest(&mut MemorySink::new(), &data, &RetryPolicy::default())
        .await
        .unwrap();
    report.record_summary(&summary);
    let report = report.finalize();

    let saved = report.save(&dir.path().join("reports")).unwrap();
    let loaded = IngestReport::load(&saved).unwrap();

    assert!(loaded.dry_run);
    assert_eq!(loaded.merged, 1);
    assert_eq!(loaded.skipped, 1);
    assert_eq!(loaded.outcome, RunOutcome::Completed);
}
