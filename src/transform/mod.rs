//! Record transform
//!
//! Maps a repaired raw record into the canonical typed row for its target
//! table: per-column coercion according to the schema's semantic types, with
//! reserved-word columns emitted under their renamed destination.
//!
//! A bad field coerces to null and never fails the record; an unexpected
//! record-level failure drops that record only, counted by the caller.

use crate::coerce;
use crate::schema::{ColumnType, TableSchema};
use crate::types::{JsonValue, RawRecord, TypedRecord};
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Transform one raw record into a typed row.
///
/// Pure and deterministic: the same input always yields the same output.
pub fn transform_record(schema: &TableSchema, raw: &RawRecord) -> TypedRecord {
    let mut out = TypedRecord::new();

    for column in &schema.columns {
        let value = raw.get(column.source).unwrap_or(&JsonValue::Null);
        let typed = match column.ty {
            ColumnType::Str => coerce::to_str(value).map(JsonValue::String),
            ColumnType::Int => coerce::to_int(value).map(JsonValue::from),
            ColumnType::Float => coerce::to_float(value)
                .and_then(serde_json::Number::from_f64)
                .map(JsonValue::Number),
            ColumnType::Date => coerce::to_date(value).map(JsonValue::String),
            ColumnType::Json => coerce::to_json(value).map(JsonValue::String),
        };
        out.insert(column.dest.to_string(), typed.unwrap_or(JsonValue::Null));
    }

    out
}

/// Transform a whole file's records, dropping any record that fails
/// unexpectedly at the record level.
///
/// Returns the typed rows plus the number of dropped records. A dropped
/// record is logged with its raw form and never aborts the remaining rows.
pub fn transform_records(
    schema: &TableSchema,
    records: &[RawRecord],
) -> (Vec<TypedRecord>, usize) {
    let mut rows = Vec::with_capacity(records.len());
    let mut dropped = 0;

    for raw in records {
        match panic::catch_unwind(AssertUnwindSafe(|| transform_record(schema, raw))) {
            Ok(row) => rows.push(row),
            Err(_) => {
                error!(record = ?raw, "record transform failed, dropping record");
                dropped += 1;
            }
        }
    }

    (rows, dropped)
}
