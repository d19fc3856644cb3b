//! Common types used throughout formload
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A raw field mapping produced by record repair, keyed by source column name
pub type RawRecord = JsonObject;

/// A typed, nullable row keyed by destination column name
pub type TypedRecord = JsonObject;

// ============================================================================
// Upload Mode
// ============================================================================

/// How rows are written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum UploadMode {
    /// Plain insert - any key conflict fails the whole batch
    #[default]
    Insert,
    /// Insert-or-update on the table's natural key
    Upsert,
}

impl std::fmt::Display for UploadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadMode::Insert => write!(f, "insert"),
            UploadMode::Upsert => write!(f, "upsert"),
        }
    }
}

// ============================================================================
// Source Format
// ============================================================================

/// Shape of the source files being loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// Delimited results export with the fixed 39-column layout
    #[default]
    Csv,
    /// Nested racecard JSON (region -> course -> off-time -> race)
    Racecards,
}

impl SourceFormat {
    /// File extension used for discovery in the pending directory
    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Racecards => "json",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Racecards => write!(f, "racecards"),
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_mode_serde() {
        let mode: UploadMode = serde_json::from_str("\"upsert\"").unwrap();
        assert_eq!(mode, UploadMode::Upsert);

        let json = serde_json::to_string(&UploadMode::Insert).unwrap();
        assert_eq!(json, "\"insert\"");
    }

    #[test]
    fn test_source_format_extension() {
        assert_eq!(SourceFormat::Csv.extension(), "csv");
        assert_eq!(SourceFormat::Racecards.extension(), "json");
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("test".to_string()).none_if_empty(),
            Some("test".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
        assert_eq!("test".to_string().none_if_empty(), Some("test".to_string()));
        assert_eq!(String::new().none_if_empty(), None);
    }
}
