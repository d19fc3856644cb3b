//! Run configuration
//!
//! Loaded from a YAML file, with store credentials overridable from the
//! environment so keys stay out of checked-in config. Validation happens
//! once at load time; the rest of the crate trusts a `Config` it is handed.

use crate::error::{Error, Result};
use crate::pipeline::PipelineConfig;
use crate::schema;
use crate::store::StoreConfig;
use crate::types::{SourceFormat, UploadMode};
use crate::upload::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable overriding the store URL
pub const ENV_STORE_URL: &str = "FORMLOAD_STORE_URL";
/// Environment variable overriding the store API key
pub const ENV_STORE_KEY: &str = "FORMLOAD_STORE_KEY";

/// Complete run configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store connection settings
    #[serde(default)]
    pub store: StoreSection,

    /// Source shape and upload settings
    #[serde(default)]
    pub source: SourceSection,

    /// Pending and processed directories
    #[serde(default)]
    pub intake: IntakeSection,
}

/// Store connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Base URL of the store (without the `/rest/v1` suffix)
    #[serde(default)]
    pub url: Option<String>,

    /// API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Source shape and upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Shape of the source files
    #[serde(default)]
    pub format: SourceFormat,

    /// Store table; defaults to the schema's table name
    #[serde(default)]
    pub table: Option<String>,

    /// Insert or upsert
    #[serde(default)]
    pub mode: UploadMode,

    /// Rows per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Upsert conflict key; defaults to the schema's natural key
    #[serde(default)]
    pub natural_key: Option<Vec<String>>,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            format: SourceFormat::default(),
            table: None,
            mode: UploadMode::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            natural_key: None,
        }
    }
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

/// Pending and processed directories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSection {
    /// Directory scanned for new files
    #[serde(default = "default_pending_dir")]
    pub pending_dir: PathBuf,

    /// Directory fully uploaded files move into
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
}

impl Default for IntakeSection {
    fn default() -> Self {
        Self {
            pending_dir: default_pending_dir(),
            processed_dir: default_processed_dir(),
        }
    }
}

fn default_pending_dir() -> PathBuf {
    PathBuf::from("data/unprocessed")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("data/processed")
}

impl Config {
    /// Load from a YAML file, then apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {e}", path.display()))
        })?;
        let mut config: Config = serde_yaml::from_str(&body)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for runs without a config file
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Ok(key) = std::env::var(ENV_STORE_KEY) {
            self.store.api_key = Some(key);
        }
    }

    fn validate(&self) -> Result<()> {
        let url = self
            .store
            .url
            .as_deref()
            .ok_or_else(|| Error::missing_field("store.url"))?;
        Url::parse(url)
            .map_err(|e| Error::invalid_value("store.url", e.to_string()))?;

        if self.store.api_key.as_deref().unwrap_or_default().is_empty() {
            return Err(Error::missing_field("store.api_key"));
        }
        if self.source.batch_size == 0 {
            return Err(Error::invalid_value("source.batch_size", "must be >= 1"));
        }
        Ok(())
    }

    /// Store client settings
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(
            self.store.url.clone().unwrap_or_default(),
            self.store.api_key.clone().unwrap_or_default(),
        )
        .with_timeout(Duration::from_secs(self.store.timeout_secs))
    }

    /// Pipeline settings, filling table and key from the schema
    pub fn pipeline_config(&self) -> PipelineConfig {
        let table_schema = schema::schema_for(self.source.format);
        PipelineConfig {
            format: self.source.format,
            table: self
                .source
                .table
                .clone()
                .unwrap_or_else(|| table_schema.table.to_string()),
            mode: self.source.mode,
            batch_size: self.source.batch_size,
            natural_key: self.source.natural_key.clone().unwrap_or_else(|| {
                table_schema
                    .natural_key
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            }),
        }
    }
}
