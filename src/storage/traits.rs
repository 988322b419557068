//! Storage traits and error types
//!
//! This module defines the trait interface for snapshot backends and
//! associated error types.

use crate::model::ProfileSummary;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot backends
///
/// A store holds at most one snapshot. `save` replaces it wholesale and
/// `load` never modifies it.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the most recently saved snapshot, or `None` if nothing was
    /// ever saved
    async fn load(&self) -> StorageResult<Option<ProfileSummary>>;

    /// Replaces the stored snapshot
    async fn save(&self, summary: &ProfileSummary) -> StorageResult<()>;
}
