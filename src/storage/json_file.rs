//! JSON file snapshot store
//!
//! The snapshot lives in one pretty-printed JSON file. Each write goes to
//! its own temp file in the same directory and is renamed over the target,
//! so a reader sees either the old snapshot or a complete new one, and
//! concurrent writers never share a temp file.

use crate::model::ProfileSummary;
use crate::storage::traits::{SnapshotStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Snapshot store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store for the given file; nothing is touched until the
    /// first `load` or `save`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the snapshot; temp files are created there so the
    /// final rename stays on one filesystem
    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Writes `json` to a fresh temp file and renames it over the snapshot
    fn write_atomically(&self, json: &[u8]) -> StorageResult<()> {
        let directory = self.directory();
        std::fs::create_dir_all(directory).map_err(|e| Self::io_error(directory, e))?;

        let mut temp =
            NamedTempFile::new_in(directory).map_err(|e| Self::io_error(directory, e))?;
        temp.write_all(json)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| Self::io_error(temp.path(), e))?;
        temp.persist(&self.path)
            .map_err(|e| Self::io_error(&self.path, e.error))?;
        Ok(())
    }

    fn io_error(path: &Path, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> StorageResult<Option<ProfileSummary>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };

        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, summary: &ProfileSummary) -> StorageResult<()> {
        let json = serde_json::to_vec_pretty(summary)?;

        let store = self.clone();
        tokio::task::spawn_blocking(move || store.write_atomically(&json))
            .await
            .map_err(|e| Self::io_error(&self.path, std::io::Error::other(e)))??;

        tracing::info!(
            "Saved snapshot with {} articles to {}",
            summary.publications.len(),
            self.path.display()
        );
        Ok(())
    }
}
