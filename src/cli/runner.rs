//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::lifecycle::Intake;
use crate::pipeline::{Pipeline, RunSummary};
use crate::store::PostgrestStore;
use std::path::{Path, PathBuf};
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command.
    ///
    /// Returns an error when any discovered file fails, so the process exit
    /// status reflects the run outcome.
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run {
                pending_dir,
                processed_dir,
            } => {
                self.run_directory(pending_dir.as_deref(), processed_dir.as_deref())
                    .await
            }
            Commands::File { path, archive } => self.run_file(path, *archive).await,
            Commands::Check => self.check().await,
        }
    }

    /// Load config and fold in command-line overrides
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.cli.config {
            Some(path) => Config::load(path)?,
            None => Config::from_env()?,
        };

        if let Some(format) = self.cli.format {
            config.source.format = format;
            // A format override resets table and key to that schema's defaults
            config.source.table = self.cli.table.clone();
            config.source.natural_key = None;
        }
        if let Some(mode) = self.cli.mode {
            config.source.mode = mode;
        }
        if let Some(batch_size) = self.cli.batch_size {
            config.source.batch_size = batch_size;
        }
        if let Some(table) = &self.cli.table {
            config.source.table = Some(table.clone());
        }

        Ok(config)
    }

    fn intake(&self, config: &Config, pending: Option<&Path>, processed: Option<&Path>) -> Result<Intake> {
        let pending: PathBuf = pending
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.intake.pending_dir.clone());
        let processed: PathBuf = processed
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.intake.processed_dir.clone());
        Intake::new(pending, processed, config.source.format.extension())
    }

    async fn run_directory(&self, pending: Option<&Path>, processed: Option<&Path>) -> Result<()> {
        let config = self.load_config()?;
        let store = PostgrestStore::new(config.store_config())?;
        let intake = self.intake(&config, pending, processed)?;

        let pipeline = Pipeline::new(&store, config.pipeline_config());
        let summary = pipeline.run(&intake).await;
        finish(&summary)
    }

    async fn run_file(&self, path: &Path, archive: bool) -> Result<()> {
        if !path.is_file() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = self.load_config()?;
        let store = PostgrestStore::new(config.store_config())?;
        let intake = if archive {
            Some(self.intake(&config, None, None)?)
        } else {
            None
        };

        let pipeline = Pipeline::new(&store, config.pipeline_config());
        let summary = pipeline.run_single(path, intake.as_ref()).await;
        finish(&summary)
    }

    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let store = PostgrestStore::new(config.store_config())?;
        store.check().await?;
        info!("store connection OK");
        Ok(())
    }
}

/// Translate a run summary into the process exit contract
fn finish(summary: &RunSummary) -> Result<()> {
    if summary.is_success() {
        Ok(())
    } else {
        Err(Error::RunFailed {
            failed: summary.files_failed(),
            total: summary.reports.len(),
        })
    }
}
