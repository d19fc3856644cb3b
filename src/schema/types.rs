//! Schema types

use serde::{Deserialize, Serialize};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Trimmed string, empty coerces to null
    Str,
    /// Integer, tolerant of trailing-`.0` exports
    Int,
    /// Float
    Float,
    /// Date string, timestamps truncated to the date part
    Date,
    /// Opaque structured blob stored as serialized JSON
    Json,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Str => write!(f, "str"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Json => write!(f, "json"),
        }
    }
}

/// A single column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name in the source file
    pub source: &'static str,
    /// Column name in the store table
    pub dest: &'static str,
    /// Semantic type applied during transform
    pub ty: ColumnType,
}

impl Column {
    /// Create a column whose source and destination names match
    pub const fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            source: name,
            dest: name,
            ty,
        }
    }

    /// Create a column renamed on the way into the store.
    ///
    /// Used for source names that collide with reserved words in the store
    /// (`or` -> `or_rating`). A static mapping rule, not dynamic dispatch.
    pub const fn renamed(source: &'static str, dest: &'static str, ty: ColumnType) -> Self {
        Self { source, dest, ty }
    }
}

/// An ordered, immutable column table for one target table
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Default store table name
    pub table: &'static str,
    /// Columns in source-file position order
    pub columns: Vec<Column>,
    /// Natural key columns (destination names) for upsert conflicts
    pub natural_key: &'static [&'static str],
}

impl TableSchema {
    /// Number of expected columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if the schema has no columns (never the case for the built-ins)
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Source column names in position order
    pub fn source_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.source)
    }

    /// Look up a column by its source name
    pub fn column(&self, source: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.source == source)
    }
}
