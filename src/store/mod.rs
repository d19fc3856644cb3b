//! Tabular store access
//!
//! The pipeline's contract with the remote store is two calls: insert a
//! batch of rows, or upsert them on a natural key, each returning the number
//! of rows the store accepted. `PostgrestStore` implements the contract
//! against a PostgREST-compatible REST endpoint; `MemoryStore` is an
//! in-process double for tests and dry runs.
//!
//! Submission errors are terminal per call: no retries, no backoff. The
//! caller attributes a failed call entirely to the batch that triggered it.

mod client;
pub mod memory;

pub use client::{PostgrestStore, StoreConfig};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::TypedRecord;
use async_trait::async_trait;

/// Contract the pipeline needs from the tabular store
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert rows; any key conflict fails the whole call.
    /// Returns the number of rows the store accepted.
    async fn insert(&self, table: &str, rows: &[TypedRecord]) -> Result<usize>;

    /// Insert-or-update rows, resolving conflicts on the given key columns.
    /// Returns the number of rows the store accepted.
    async fn upsert(
        &self,
        table: &str,
        rows: &[TypedRecord],
        conflict_columns: &[String],
    ) -> Result<usize>;
}
