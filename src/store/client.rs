//! PostgREST-compatible store client
//!
//! Speaks the REST dialect of PostgREST-backed stores: rows are posted as a
//! JSON array to `/rest/v1/{table}`, authenticated with an `apikey` header,
//! and the accepted rows come back as the returned representation. Upserts
//! ride the same endpoint with `Prefer: resolution=merge-duplicates` and an
//! `on_conflict` column list.

use super::TableStore;
use crate::error::{Error, Result};
use crate::types::TypedRecord;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the store client
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store (without the `/rest/v1` suffix)
    pub base_url: String,
    /// API key, sent as both `apikey` and bearer token
    pub api_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl StoreConfig {
    /// Create a config with the default timeout
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Store client for a PostgREST-compatible endpoint
pub struct PostgrestStore {
    client: Client,
    config: StoreConfig,
}

impl PostgrestStore {
    /// Create a new store client.
    ///
    /// Validates the base URL up front so a bad config fails at startup,
    /// not at the first batch.
    pub fn new(config: StoreConfig) -> Result<Self> {
        Url::parse(&config.base_url)?;
        if config.api_key.is_empty() {
            return Err(Error::missing_field("store.api_key"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("formload/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Probe the REST root for reachability
    pub async fn check(&self) -> Result<()> {
        let url = format!("{}/rest/v1/", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::connection_check(format!(
                "store answered HTTP {}",
                status.as_u16()
            )))
        }
    }

    async fn submit(
        &self,
        table: &str,
        rows: &[TypedRecord],
        prefer: &str,
        on_conflict: Option<&str>,
    ) -> Result<usize> {
        let mut request = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Prefer", prefer)
            .json(rows);

        if let Some(columns) = on_conflict {
            request = request.query(&[("on_conflict", columns)]);
        }

        let response = request.send().await?;
        self.accepted_rows(response).await
    }

    /// Count accepted rows from the returned representation.
    ///
    /// A success response without a representation counts as zero accepted;
    /// the caller treats that conservatively as a failed batch.
    async fn accepted_rows(&self, response: Response) -> Result<usize> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(Error::store_status(status.as_u16(), body));
        }

        let accepted = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.as_array().map(Vec::len))
            .unwrap_or(0);
        debug!(accepted, "store accepted rows");
        Ok(accepted)
    }
}

#[async_trait]
impl TableStore for PostgrestStore {
    async fn insert(&self, table: &str, rows: &[TypedRecord]) -> Result<usize> {
        self.submit(table, rows, "return=representation", None).await
    }

    async fn upsert(
        &self,
        table: &str,
        rows: &[TypedRecord],
        conflict_columns: &[String],
    ) -> Result<usize> {
        self.submit(
            table,
            rows,
            "resolution=merge-duplicates,return=representation",
            Some(&conflict_columns.join(",")),
        )
        .await
    }
}
