//! In-memory store double
//!
//! Implements the `TableStore` contract against a `Mutex`-guarded map so
//! pipeline and uploader behavior can be tested with deterministic counters
//! and scripted failures, without a network.

use super::TableStore;
use crate::error::{Error, Result};
use crate::types::{JsonValue, TypedRecord};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    /// Rows keyed by (table, natural-key values); insert-mode rows get a
    /// synthetic unique key so duplicates accumulate like a keyless table
    rows: HashMap<(String, Vec<String>), TypedRecord>,
    insert_seq: usize,
    calls: usize,
}

/// An in-memory `TableStore` with scripted failure behavior
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    /// 1-based submission call numbers that fail outright
    fail_calls: HashSet<usize>,
    /// If set, every call reports at most this many accepted rows
    accept_at_most: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the given submission calls (1-based, counting insert and upsert
    /// calls together) with a store error
    #[must_use]
    pub fn failing_calls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.fail_calls = calls.into_iter().collect();
        self
    }

    /// Report at most `n` accepted rows per call without erroring
    #[must_use]
    pub fn accepting_at_most(mut self, n: usize) -> Self {
        self.accept_at_most = Some(n);
        self
    }

    /// Total rows currently stored across all tables
    pub fn row_count(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }

    /// Number of submission calls made so far
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    /// Stored rows for one table, in no particular order
    pub fn table_rows(&self, table: &str) -> Vec<TypedRecord> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .filter(|((t, _), _)| t == table)
            .map(|(_, row)| row.clone())
            .collect()
    }

    fn begin_call(&self, inner: &mut Inner) -> Result<()> {
        inner.calls += 1;
        if self.fail_calls.contains(&inner.calls) {
            return Err(Error::store_status(500, "scripted failure"));
        }
        Ok(())
    }

    fn accepted(&self, submitted: usize) -> usize {
        match self.accept_at_most {
            Some(cap) => submitted.min(cap),
            None => submitted,
        }
    }
}

fn key_values(row: &TypedRecord, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| {
            row.get(c)
                .cloned()
                .unwrap_or(JsonValue::Null)
                .to_string()
        })
        .collect()
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn insert(&self, table: &str, rows: &[TypedRecord]) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        self.begin_call(&mut inner)?;

        for row in rows {
            inner.insert_seq += 1;
            let key = vec![format!("__row_{}", inner.insert_seq)];
            inner.rows.insert((table.to_string(), key), row.clone());
        }
        Ok(self.accepted(rows.len()))
    }

    async fn upsert(
        &self,
        table: &str,
        rows: &[TypedRecord],
        conflict_columns: &[String],
    ) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        self.begin_call(&mut inner)?;

        for row in rows {
            let key = key_values(row, conflict_columns);
            inner.rows.insert((table.to_string(), key), row.clone());
        }
        Ok(self.accepted(rows.len()))
    }
}
