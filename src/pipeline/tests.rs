//! Tests for the pipeline module

use super::*;
use crate::schema;
use crate::store::MemoryStore;
use serde_json::json;
use std::fs;
use tempfile::tempdir;

fn csv_body(rows: usize) -> String {
    let mut body = schema::results()
        .source_names()
        .collect::<Vec<_>>()
        .join(",");
    body.push('\n');
    for i in 0..rows {
        let mut fields = vec![String::new(); schema::results().len()];
        fields[0] = "2025-07-01".into(); // date
        fields[2] = "Ascot".into(); // course
        fields[4] = "Summer Mile".into(); // race_name
        fields[17] = (i + 1).to_string(); // pos
        fields[21] = format!("horse_{i}"); // horse
        body.push_str(&fields.join(","));
        body.push('\n');
    }
    body
}

fn csv_config() -> PipelineConfig {
    PipelineConfig::for_format(SourceFormat::Csv)
}

fn make_intake(root: &Path) -> Intake {
    Intake::new(root.join("unprocessed"), root.join("processed"), "csv").unwrap()
}

#[tokio::test]
async fn test_clean_file_uploads_and_archives() {
    let root = tempdir().unwrap();
    let intake = make_intake(root.path());
    let source = intake.pending_dir().join("2025_07_01.csv");
    fs::write(&source, csv_body(10)).unwrap();

    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, csv_config());
    let summary = pipeline.run(&intake).await;

    assert!(summary.is_success());
    assert_eq!(summary.rows_accepted(), 10);
    assert_eq!(store.row_count(), 10);
    assert!(!source.exists());
    assert!(root.path().join("processed/2025_07_01.csv").exists());
}

#[tokio::test]
async fn test_failed_batch_leaves_file_pending() {
    let root = tempdir().unwrap();
    let intake = make_intake(root.path());
    let source = intake.pending_dir().join("2025_07_01.csv");
    fs::write(&source, csv_body(250)).unwrap();

    // 250 rows at batch size 100: batches of 100, 100, 50; batch 2 fails
    let store = MemoryStore::new().failing_calls([2]);
    let pipeline = Pipeline::new(&store, csv_config());
    let summary = pipeline.run(&intake).await;

    assert!(!summary.is_success());
    let report = &summary.reports[0];
    assert_eq!(report.outcome.batches.len(), 3);
    assert_eq!(report.outcome.accepted, 150);
    assert_eq!(report.outcome.failed, 100);

    // The file never moved
    assert!(source.exists());
    assert!(report.archived_to.is_none());
}

#[tokio::test]
async fn test_zero_row_file_never_reaches_store() {
    let root = tempdir().unwrap();
    let intake = make_intake(root.path());
    let source = intake.pending_dir().join("empty.csv");
    fs::write(&source, csv_body(0)).unwrap(); // header only

    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, csv_config());
    let summary = pipeline.run(&intake).await;

    assert!(!summary.is_success());
    assert_eq!(store.call_count(), 0);
    assert!(source.exists());
    assert!(summary.reports[0].error.as_deref().unwrap().contains("no parseable rows"));
}

#[tokio::test]
async fn test_sibling_files_are_isolated() {
    let root = tempdir().unwrap();
    let intake = make_intake(root.path());
    fs::write(intake.pending_dir().join("a_good.csv"), csv_body(5)).unwrap();
    fs::write(intake.pending_dir().join("b_empty.csv"), csv_body(0)).unwrap();
    fs::write(intake.pending_dir().join("c_good.csv"), csv_body(5)).unwrap();

    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, csv_config());
    let summary = pipeline.run(&intake).await;

    // The bad file fails alone; both good files upload and archive
    assert!(!summary.is_success());
    assert_eq!(summary.files_succeeded(), 2);
    assert_eq!(summary.files_failed(), 1);
    assert!(root.path().join("processed/a_good.csv").exists());
    assert!(root.path().join("processed/c_good.csv").exists());
    assert!(intake.pending_dir().join("b_empty.csv").exists());
}

#[tokio::test]
async fn test_same_name_files_archive_without_overwrite() {
    let root = tempdir().unwrap();
    let intake = make_intake(root.path());
    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, csv_config());

    fs::write(intake.pending_dir().join("results.csv"), csv_body(3)).unwrap();
    assert!(pipeline.run(&intake).await.is_success());

    fs::write(intake.pending_dir().join("results.csv"), csv_body(4)).unwrap();
    assert!(pipeline.run(&intake).await.is_success());

    let archived: Vec<_> = fs::read_dir(root.path().join("processed"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(archived.len(), 2);
    assert!(archived.iter().any(|n| n == "results.csv"));
    assert!(archived.iter().any(|n| n != "results.csv" && n.starts_with("results_")));

    // Both uploads landed; nothing was overwritten
    assert_eq!(store.row_count(), 7);
}

#[tokio::test]
async fn test_single_file_mode_without_archive() {
    let root = tempdir().unwrap();
    let source = root.path().join("adhoc.csv");
    fs::write(&source, csv_body(5)).unwrap();

    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, csv_config());
    let summary = pipeline.run_single(&source, None).await;

    assert!(summary.is_success());
    assert_eq!(store.row_count(), 5);
    // No intake given: the file stays where it is
    assert!(source.exists());
}

#[tokio::test]
async fn test_racecards_upsert_end_to_end() {
    let root = tempdir().unwrap();
    let intake = Intake::new(
        root.path().join("unprocessed"),
        root.path().join("processed"),
        "json",
    )
    .unwrap();

    let body = json!({
        "GB": {
            "Ascot": {
                "13:30": {
                    "race_id": "871532",
                    "date": "2025-07-26",
                    "course": "Ascot",
                    "region": "GB",
                    "runners": [
                        {"horse_id": "101", "name": "Quickstep"},
                        {"horse_id": "102", "name": "Slow Waltz"}
                    ]
                }
            }
        }
    })
    .to_string();
    fs::write(intake.pending_dir().join("racecards.json"), &body).unwrap();

    let store = MemoryStore::new();
    let mut config = PipelineConfig::for_format(SourceFormat::Racecards);
    config.mode = UploadMode::Upsert;
    let pipeline = Pipeline::new(&store, config);

    let summary = pipeline.run(&intake).await;
    assert!(summary.is_success());
    assert_eq!(store.row_count(), 2);

    // Re-uploading the same card (same natural keys) does not duplicate
    fs::write(intake.pending_dir().join("racecards.json"), &body).unwrap();
    let again = Pipeline::new(
        &store,
        {
            let mut c = PipelineConfig::for_format(SourceFormat::Racecards);
            c.mode = UploadMode::Upsert;
            c
        },
    );
    assert!(again.run(&intake).await.is_success());
    assert_eq!(store.row_count(), 2);
}

#[tokio::test]
async fn test_empty_pending_directory_is_clean_run() {
    let root = tempdir().unwrap();
    let intake = make_intake(root.path());

    let store = MemoryStore::new();
    let pipeline = Pipeline::new(&store, csv_config());
    let summary = pipeline.run(&intake).await;

    assert!(summary.is_success());
    assert!(summary.reports.is_empty());
}
