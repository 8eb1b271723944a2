//! Snapshot file access
//!
//! Reads and writes registry snapshots stored as a single JSON document on
//! disk. Used both for the cache's own snapshot and for npm's registry mirror.

use std::path::{Path, PathBuf};

use crate::core::package::{PackageSet, Snapshot, SnapshotDocument};
use crate::error::{CacheError, FilesystemError};
use crate::infra::filesystem;

/// A snapshot document read from disk, with the file's modification time
#[derive(Debug)]
pub struct LoadedSnapshot {
    /// File modification time in epoch milliseconds
    pub modified: i64,
    /// Parsed document
    pub snapshot: Snapshot,
}

/// A snapshot stored at a fixed path
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        filesystem::exists(&self.path).await
    }

    /// Read the modification time and parse the document
    ///
    /// Nothing is returned unless both succeed.
    pub async fn load(&self) -> Result<LoadedSnapshot, CacheError> {
        let modified = filesystem::modified_millis(&self.path).await?;
        let bytes = filesystem::read_file(&self.path).await?;

        tracing::debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        let snapshot = Snapshot::parse(&bytes).map_err(|e| CacheError::MalformedCache {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        Ok(LoadedSnapshot { modified, snapshot })
    }

    /// Serialize `packages`, preceded by the `_updated` marker
    pub async fn save(
        &self,
        updated: Option<i64>,
        packages: &PackageSet,
    ) -> Result<(), FilesystemError> {
        let document = SnapshotDocument { updated, packages };
        let bytes = serde_json::to_vec(&document).map_err(|e| FilesystemError::WriteFile {
            path: self.path.clone(),
            error: e.to_string(),
        })?;

        filesystem::write_file(&self.path, &bytes).await?;
        tracing::info!(
            "Wrote {} packages ({} bytes) to {}",
            packages.len(),
            bytes.len(),
            self.path.display()
        );
        Ok(())
    }
}
