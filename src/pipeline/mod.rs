//! Pipeline orchestration
//!
//! Drives one run: discover pending files, and for each one repair ->
//! transform -> upload -> archive. Failures are recovered at the narrowest
//! scope and aggregated upward as counts; no file's failure stops its
//! siblings, and a file leaves the pending location only after its upload
//! is verified fully successful.

mod types;

pub use types::{FileReport, RunSummary};

use crate::lifecycle::Intake;
use crate::repair::{CsvRepairer, RacecardFlattener, RecordSource};
use crate::schema::{self, TableSchema};
use crate::store::TableStore;
use crate::transform;
use crate::types::{SourceFormat, UploadMode};
use crate::upload::{Uploader, DEFAULT_BATCH_SIZE};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

/// Settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Shape of the source files
    pub format: SourceFormat,
    /// Store table to load into; defaults to the schema's table
    pub table: String,
    /// Insert or upsert
    pub mode: UploadMode,
    /// Rows per batch
    pub batch_size: usize,
    /// Upsert conflict key; defaults to the schema's natural key
    pub natural_key: Vec<String>,
}

impl PipelineConfig {
    /// Defaults for a source format, taking table and key from its schema
    pub fn for_format(format: SourceFormat) -> Self {
        let schema = schema::schema_for(format);
        Self {
            format,
            table: schema.table.to_string(),
            mode: UploadMode::Insert,
            batch_size: DEFAULT_BATCH_SIZE,
            natural_key: schema.natural_key.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The record-repair-and-load pipeline.
///
/// Owns the run's context explicitly: the store handle and configuration are
/// fields here and passed into each component call, never ambient state.
pub struct Pipeline<'a> {
    store: &'a dyn TableStore,
    config: PipelineConfig,
    schema: &'static TableSchema,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline over a store handle
    pub fn new(store: &'a dyn TableStore, config: PipelineConfig) -> Self {
        let schema = schema::schema_for(config.format);
        Self {
            store,
            config,
            schema,
        }
    }

    fn parser(&self) -> Box<dyn RecordSource> {
        match self.config.format {
            SourceFormat::Csv => Box::new(CsvRepairer::new(self.schema)),
            SourceFormat::Racecards => Box::new(RacecardFlattener::new()),
        }
    }

    /// Run repair, transform, and upload for one file. Does not archive.
    pub async fn process_file(&self, path: &Path) -> FileReport {
        let mut report = FileReport::new(path);
        info!(file = %path.display(), "processing file");

        let body = match fs::read_to_string(path) {
            Ok(body) => body,
            Err(e) => {
                error!(file = %path.display(), error = %e, "failed to read file");
                report.error = Some(e.to_string());
                return report;
            }
        };

        let parsed = match self.parser().parse(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!(file = %path.display(), error = %e, "failed to parse file");
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.parsed = parsed.records.len();
        report.skipped_rows = parsed.skipped;

        if parsed.records.is_empty() {
            // Nothing usable: the file is a failure and never reaches the store
            error!(file = %path.display(), "no parseable rows");
            report.error = Some("no parseable rows".to_string());
            return report;
        }
        info!(
            file = %path.display(),
            rows = report.parsed,
            skipped = report.skipped_rows,
            "parsed file"
        );

        let (rows, dropped) = transform::transform_records(self.schema, &parsed.records);
        report.dropped_records = dropped;
        if rows.is_empty() {
            error!(file = %path.display(), "no records survived transform");
            report.error = Some("no records survived transform".to_string());
            return report;
        }

        let uploader = Uploader::new(self.store, self.config.mode, self.config.batch_size);
        report.outcome = uploader
            .upload(&self.config.table, &self.config.natural_key, &rows)
            .await;

        report
    }

    /// Process one file and, on full success, archive it
    pub async fn process_and_archive(&self, path: &Path, intake: &Intake) -> FileReport {
        let mut report = self.process_file(path).await;

        if report.upload_succeeded() {
            match intake.archive(path) {
                Ok(dest) => report.archived_to = Some(dest),
                Err(e) => {
                    // Data is stored; only the archival step failed. Operators
                    // must not re-upload this file.
                    error!(file = %path.display(), error = %e, "archive failed after upload");
                    report.archive_error = Some(e.to_string());
                }
            }
        } else {
            warn!(
                file = %path.display(),
                accepted = report.outcome.accepted,
                failed = report.outcome.failed,
                "file not fully uploaded, leaving in pending"
            );
        }

        report
    }

    /// Directory mode: process every discovered pending file.
    ///
    /// Every file is attempted regardless of earlier failures.
    pub async fn run(&self, intake: &Intake) -> RunSummary {
        let mut summary = RunSummary::default();

        let files = match intake.discover() {
            Ok(files) => files,
            Err(e) => {
                error!(error = %e, "failed to scan pending directory");
                let mut report = FileReport::new(intake.pending_dir());
                report.error = Some(e.to_string());
                summary.add(report);
                return summary;
            }
        };

        if files.is_empty() {
            info!("no pending files found");
            return summary;
        }

        for file in files {
            summary.add(self.process_and_archive(&file, intake).await);
        }

        log_summary(&summary);
        summary
    }

    /// Single-file mode, with archiving opt-in
    pub async fn run_single(&self, path: &Path, intake: Option<&Intake>) -> RunSummary {
        let mut summary = RunSummary::default();
        let report = match intake {
            Some(intake) => self.process_and_archive(path, intake).await,
            None => self.process_file(path).await,
        };
        summary.add(report);
        log_summary(&summary);
        summary
    }
}

fn log_summary(summary: &RunSummary) {
    info!(
        files = summary.reports.len(),
        succeeded = summary.files_succeeded(),
        failed = summary.files_failed(),
        rows_accepted = summary.rows_accepted(),
        rows_failed = summary.rows_failed(),
        "run complete"
    );
    for report in &summary.reports {
        if let Some(e) = &report.archive_error {
            warn!(
                file = %report.path.display(),
                error = %e,
                "rows are stored but the file is still in pending; do not re-upload"
            );
        }
    }
}

#[cfg(test)]
mod tests;
