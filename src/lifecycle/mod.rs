//! File lifecycle
//!
//! Source files live in a pending-intake directory and move to a
//! processed-archive directory exactly once, only after a verified fully
//! successful upload. The move is a single rename: either the file ends up
//! in the archive or it stays untouched where it was. A name collision in
//! the archive is resolved with a timestamp suffix, never by overwriting.

use crate::error::{Error, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Pending and processed locations for one run
#[derive(Debug, Clone)]
pub struct Intake {
    pending_dir: PathBuf,
    processed_dir: PathBuf,
    extension: String,
}

impl Intake {
    /// Create the intake, making sure both directories exist
    pub fn new(
        pending_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Result<Self> {
        let intake = Self {
            pending_dir: pending_dir.into(),
            processed_dir: processed_dir.into(),
            extension: extension.into(),
        };
        fs::create_dir_all(&intake.pending_dir)?;
        fs::create_dir_all(&intake.processed_dir)?;
        Ok(intake)
    }

    /// The pending-intake directory
    pub fn pending_dir(&self) -> &Path {
        &self.pending_dir
    }

    /// Discover pending files by extension, sorted by name so runs are
    /// deterministic
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.pending_dir)? {
            let path = entry?.path();
            let matches = path.is_file()
                && path
                    .extension()
                    .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension));
            if matches {
                files.push(path);
            }
        }
        files.sort();
        info!(
            count = files.len(),
            dir = %self.pending_dir.display(),
            "discovered pending files"
        );
        Ok(files)
    }

    /// Move a fully uploaded file into the archive.
    ///
    /// Returns the destination path, which carries a timestamp suffix when
    /// the original name is already taken.
    pub fn archive(&self, path: &Path) -> Result<PathBuf> {
        let name = path
            .file_name()
            .ok_or_else(|| Error::archive(path.display().to_string(), "no file name"))?;

        let mut dest = self.processed_dir.join(name);
        if dest.exists() {
            dest = self.timestamped_destination(path);
            warn!(
                original = %name.to_string_lossy(),
                renamed = %dest.display(),
                "archive name collision, appending timestamp"
            );
            if dest.exists() {
                return Err(Error::archive(
                    path.display().to_string(),
                    format!("destination already exists: {}", dest.display()),
                ));
            }
        }

        fs::rename(path, &dest)
            .map_err(|e| Error::archive(path.display().to_string(), e.to_string()))?;
        info!(from = %path.display(), to = %dest.display(), "archived file");
        Ok(dest)
    }

    fn timestamped_destination(&self, path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let name = match path.extension() {
            Some(ext) => format!("{stem}_{timestamp}.{}", ext.to_string_lossy()),
            None => format!("{stem}_{timestamp}"),
        };
        self.processed_dir.join(name)
    }
}
