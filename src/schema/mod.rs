//! Expected schemas
//!
//! The fixed column tables for the two table variants: the flat
//! historical-results row and the flattened racecard row. Each table defines
//! field position, semantic type, destination column name, and the natural
//! key used for upsert conflict resolution.
//!
//! Schemas are defined once and immutable; positional mapping during repair
//! always follows these tables, never the file header.

mod tables;
mod types;

pub use tables::{racecards, results, schema_for};
pub use types::{Column, ColumnType, TableSchema};
