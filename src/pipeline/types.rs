//! Pipeline report types

use crate::upload::FileOutcome;
use serde::Serialize;
use std::path::PathBuf;

/// Everything that happened to one source file
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReport {
    /// Source path in the pending location
    pub path: PathBuf,
    /// Raw records parsed out of the file
    pub parsed: usize,
    /// Rows skipped during repair as unrecoverable
    pub skipped_rows: usize,
    /// Records dropped by the transform
    pub dropped_records: usize,
    /// Batch upload aggregate
    pub outcome: FileOutcome,
    /// Where the file was archived, when it was
    pub archived_to: Option<PathBuf>,
    /// Failure that stopped the file before or during upload
    pub error: Option<String>,
    /// Archive failure after a successful upload; the data is stored and
    /// must not be re-uploaded
    pub archive_error: Option<String>,
}

impl FileReport {
    /// Create an empty report for a path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// True when the upload itself was fully successful
    pub fn upload_succeeded(&self) -> bool {
        self.error.is_none()
            && self.parsed > 0
            && self.dropped_records == 0
            && self.outcome.is_fully_successful()
    }

    /// True when the file counts as cleanly finished for the run
    pub fn is_success(&self) -> bool {
        self.upload_succeeded() && self.archive_error.is_none()
    }
}

/// Aggregate over every file attempted in a run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Per-file reports, in processing order
    pub reports: Vec<FileReport>,
}

impl RunSummary {
    /// Fold in one file's report
    pub fn add(&mut self, report: FileReport) {
        self.reports.push(report);
    }

    /// Files that finished cleanly
    pub fn files_succeeded(&self) -> usize {
        self.reports.iter().filter(|r| r.is_success()).count()
    }

    /// Files that failed anywhere in the pipeline
    pub fn files_failed(&self) -> usize {
        self.reports.len() - self.files_succeeded()
    }

    /// Rows accepted across all files
    pub fn rows_accepted(&self) -> usize {
        self.reports.iter().map(|r| r.outcome.accepted).sum()
    }

    /// Rows failed across all files, including transform drops
    pub fn rows_failed(&self) -> usize {
        self.reports
            .iter()
            .map(|r| r.outcome.failed + r.dropped_records)
            .sum()
    }

    /// True only when every attempted file finished cleanly.
    /// Decides the process exit status.
    pub fn is_success(&self) -> bool {
        self.reports.iter().all(FileReport::is_success)
    }
}
