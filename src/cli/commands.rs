//! CLI commands and argument parsing

use crate::types::{SourceFormat, UploadMode};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Racing results and racecards loader
#[derive(Parser, Debug)]
#[command(name = "formload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Source format override
    #[arg(short, long, global = true)]
    pub format: Option<SourceFormat>,

    /// Upload mode override
    #[arg(short, long, global = true)]
    pub mode: Option<UploadMode>,

    /// Batch size override
    #[arg(short, long, global = true)]
    pub batch_size: Option<usize>,

    /// Store table override
    #[arg(short, long, global = true)]
    pub table: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every pending file, archiving each fully uploaded one
    Run {
        /// Pending-intake directory override
        #[arg(long)]
        pending_dir: Option<PathBuf>,

        /// Processed-archive directory override
        #[arg(long)]
        processed_dir: Option<PathBuf>,
    },

    /// Process a single file
    File {
        /// The file to load
        path: PathBuf,

        /// Move the file to the processed directory on full success
        #[arg(long)]
        archive: bool,
    },

    /// Probe the store connection
    Check,
}
