//! Record repair
//!
//! Parsers that turn a source file body into a sequence of raw field
//! mappings, repairing what can be repaired and skipping what cannot.
//!
//! # Overview
//!
//! Two source shapes are supported:
//! - delimited results exports, where ragged rows (wrong column counts caused
//!   by unescaped delimiters in the free-text comment) are deterministically
//!   padded or rejoined back to the expected column count;
//! - nested racecard JSON, where a three-level grouping is flattened into one
//!   row per runner.
//!
//! Both parsers read the whole body eagerly and isolate failures at row
//! granularity: a bad row is skipped with a diagnostic and counted, never
//! aborting the rest of the file.

mod csv;
mod racecards;

pub use csv::CsvRepairer;
pub use racecards::RacecardFlattener;

use crate::error::Result;
use crate::types::RawRecord;

/// Parsed records plus the number of rows skipped as unrecoverable
#[derive(Debug, Default)]
pub struct ParseOutput {
    /// Repaired raw records, in source order
    pub records: Vec<RawRecord>,
    /// Rows that could not be repaired into the expected shape
    pub skipped: usize,
}

/// A parser from a source file body to raw records
pub trait RecordSource: Send + Sync {
    /// Parse the full body. Row-level problems are skipped and counted;
    /// only a structurally unreadable body returns an error.
    fn parse(&self, body: &str) -> Result<ParseOutput>;
}

#[cfg(test)]
mod tests;
