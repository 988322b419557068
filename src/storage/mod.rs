//! Storage module for the persisted snapshot
//!
//! This module handles the single snapshot of the last successful
//! aggregation run:
//! - The `SnapshotStore` trait injected into the aggregator and HTTP layer
//! - A JSON file backend with replace-on-write semantics
//! - An in-memory backend

mod json_file;
mod memory;
mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{SnapshotStore, StorageError, StorageResult};

use crate::config::OutputConfig;

/// Opens the snapshot store described by the output configuration
pub fn open_store(config: &OutputConfig) -> JsonFileStore {
    JsonFileStore::new(&config.snapshot_path)
}
