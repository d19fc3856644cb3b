// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # formload
//!
//! Batch loader for semi-structured racing data: repairs ragged rows,
//! coerces fields into a strict typed schema, and uploads them to a
//! PostgREST-compatible table store in accounted batches, moving source
//! files from pending to processed only on verified success.
//!
//! ## Architecture
//!
//! ```text
//! source file ──> repair ──> transform ──> upload ──> lifecycle
//!                (raw rows)  (typed rows)  (batches)   (pending -> processed)
//!                     │            │            │             │
//!                   schema       coerce       store        summary
//! ```
//!
//! Failures recover at the narrowest scope: a dirty field coerces to null, a
//! broken row is skipped, a failed batch is isolated, a failed file stays
//! pending; the run reports aggregate counts and exits nonzero if any file
//! failed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Run configuration
pub mod config;

/// Field coercion to typed, nullable values
pub mod coerce;

/// Expected column tables
pub mod schema;

/// Record repair: CSV row repair and racecard flattening
pub mod repair;

/// Raw record to typed record transform
pub mod transform;

/// Tabular store contract and clients
pub mod store;

/// Batch upload with partial-failure accounting
pub mod upload;

/// Pending/processed file lifecycle
pub mod lifecycle;

/// Per-file orchestration and run summary
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::Config;
pub use pipeline::{Pipeline, PipelineConfig, RunSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
