//! Batch upload
//!
//! Partitions a file's typed rows into fixed-size batches and submits them
//! to the store in sequence, insert or upsert mode. Batches are isolated: a
//! failed batch counts all of its rows as failed and the next batch is still
//! attempted. There is no retry; a submission error is terminal for its
//! batch. A non-error response accepting fewer rows than submitted is
//! counted conservatively as a whole-batch failure, since the store does not
//! report which subset succeeded.

mod types;

pub use types::{BatchOutcome, FileOutcome};

use crate::store::TableStore;
use crate::types::{TypedRecord, UploadMode};
use tracing::{error, info, warn};

/// Default rows per batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Submits a file's rows to the store in batches
pub struct Uploader<'a> {
    store: &'a dyn TableStore,
    mode: UploadMode,
    batch_size: usize,
}

impl<'a> Uploader<'a> {
    /// Create an uploader over a store handle
    pub fn new(store: &'a dyn TableStore, mode: UploadMode, batch_size: usize) -> Self {
        Self {
            store,
            mode,
            batch_size: batch_size.max(1),
        }
    }

    /// Upload all rows, returning the per-file aggregate outcome
    pub async fn upload(
        &self,
        table: &str,
        conflict_key: &[String],
        rows: &[TypedRecord],
    ) -> FileOutcome {
        let mut outcome = FileOutcome::default();

        if rows.is_empty() {
            warn!(table, "no rows to upload after transform, skipping submission");
            return outcome;
        }

        let total = rows.len();
        info!(
            table,
            total,
            batch_size = self.batch_size,
            mode = %self.mode,
            "starting upload"
        );

        for (i, batch) in rows.chunks(self.batch_size).enumerate() {
            let index = i + 1;
            let submitted = batch.len();

            let result = match self.mode {
                UploadMode::Insert => self.store.insert(table, batch).await,
                UploadMode::Upsert => self.store.upsert(table, batch, conflict_key).await,
            };

            let batch_outcome = match result {
                Ok(accepted) if accepted == submitted => {
                    info!(batch = index, accepted, "batch uploaded");
                    BatchOutcome::success(index, submitted)
                }
                Ok(accepted) => {
                    // The store did not say which rows made it, so the whole
                    // batch is counted failed rather than guessing a subset.
                    warn!(
                        batch = index,
                        submitted, accepted, "partial acceptance, counting batch as failed"
                    );
                    BatchOutcome::failure(
                        index,
                        submitted,
                        Some(format!("store accepted {accepted} of {submitted} rows")),
                    )
                }
                Err(e) => {
                    error!(batch = index, submitted, error = %e, "batch upload failed");
                    BatchOutcome::failure(index, submitted, Some(e.to_string()))
                }
            };

            outcome.add(batch_outcome);
        }

        info!(
            table,
            accepted = outcome.accepted,
            failed = outcome.failed,
            "upload complete"
        );
        outcome
    }
}
