//! Upload outcome types

use serde::Serialize;

/// Outcome of submitting one batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// 1-based batch number within the file
    pub index: usize,
    /// Rows submitted in this batch
    pub submitted: usize,
    /// Rows the store verifiably accepted
    pub accepted: usize,
    /// Rows counted as failed
    pub failed: usize,
    /// The triggering error, if the batch failed on a store error
    pub error: Option<String>,
}

impl BatchOutcome {
    /// A fully accepted batch
    pub fn success(index: usize, submitted: usize) -> Self {
        Self {
            index,
            submitted,
            accepted: submitted,
            failed: 0,
            error: None,
        }
    }

    /// A batch counted entirely failed
    pub fn failure(index: usize, submitted: usize, error: Option<String>) -> Self {
        Self {
            index,
            submitted,
            accepted: 0,
            failed: submitted,
            error,
        }
    }
}

/// Aggregate outcome for one file's upload
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileOutcome {
    /// Sum of accepted rows across batches
    pub accepted: usize,
    /// Sum of failed rows across batches
    pub failed: usize,
    /// Per-batch outcomes, in submission order
    pub batches: Vec<BatchOutcome>,
}

impl FileOutcome {
    /// Fold one batch outcome into the aggregate
    pub fn add(&mut self, batch: BatchOutcome) {
        self.accepted += batch.accepted;
        self.failed += batch.failed;
        self.batches.push(batch);
    }

    /// True when zero rows failed across all batches
    pub fn is_fully_successful(&self) -> bool {
        self.failed == 0
    }
}
