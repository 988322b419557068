//! Scholar-Snapshot: a Google Scholar profile scraper for a portfolio site
//!
//! This crate pages through a public Google Scholar profile, merges the
//! publication list, caches the result as a JSON snapshot and serves that
//! snapshot over HTTP.

pub mod config;
pub mod model;
pub mod scholar;
pub mod server;
pub mod storage;

use thiserror::Error;

/// Main error type for Scholar-Snapshot operations
#[derive(Debug, Error)]
pub enum ScholarError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid CSS selector: {0}")]
    Selector(String),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Aggregation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Scholar-Snapshot operations
pub type Result<T> = std::result::Result<T, ScholarError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{ProfileHeader, ProfileSummary, Publication};
pub use scholar::{Aggregator, PageDelay, PublicationSource, ScholarSource};
pub use storage::{JsonFileStore, MemoryStore, SnapshotStore};
