use crate::model::ProfileSummary;
use crate::storage::traits::{SnapshotStore, StorageResult};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Snapshot store that keeps the snapshot in memory
///
/// Used when no file should be touched, e.g. in tests or `--dry-run`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RwLock<Option<ProfileSummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `summary`
    pub fn with_snapshot(summary: ProfileSummary) -> Self {
        Self {
            snapshot: RwLock::new(Some(summary)),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> StorageResult<Option<ProfileSummary>> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn save(&self, summary: &ProfileSummary) -> StorageResult<()> {
        *self.snapshot.write().await = Some(summary.clone());
        Ok(())
    }
}
