//! Error types for formload
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Failures are recovered at the narrowest possible scope (field -> record ->
//! batch -> file) and aggregated upward as counts; the variants here cover the
//! cases that escape a scope, not the per-row diagnostics that stay inside it.

use thiserror::Error;

/// The main error type for formload
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Parse / Repair Errors
    // ============================================================================
    #[error("Failed to parse source file '{path}': {message}")]
    Parse { path: String, message: String },

    // ============================================================================
    // Store Errors
    // ============================================================================
    #[error("Store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store rejected request: HTTP {status}: {body}")]
    StoreStatus { status: u16, body: String },

    #[error("Store connection check failed: {message}")]
    ConnectionCheck { message: String },

    // ============================================================================
    // Run Errors
    // ============================================================================
    #[error("Run incomplete: {failed} of {total} files failed")]
    RunFailed { failed: usize, total: usize },

    // ============================================================================
    // File Lifecycle Errors
    // ============================================================================
    /// Archival failed after a fully successful upload. Surfaced as its own
    /// class so operators know the data is stored and must not be re-uploaded.
    #[error("Failed to archive '{path}' after successful upload: {message}")]
    Archive { path: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a store status error
    pub fn store_status(status: u16, body: impl Into<String>) -> Self {
        Self::StoreStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a connection check error
    pub fn connection_check(message: impl Into<String>) -> Self {
        Self::ConnectionCheck {
            message: message.into(),
        }
    }

    /// Create an archive error
    pub fn archive(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for failures where row data reached the store but the file could
    /// not be moved out of the pending location.
    pub fn is_archive_failure(&self) -> bool {
        matches!(self, Error::Archive { .. })
    }
}

/// Result type alias for formload
pub type Result<T> = std::result::Result<T, Error>;
