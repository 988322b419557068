//! Configuration module for Scholar-Snapshot
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use scholar_snapshot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Will collect up to {} publications", config.aggregation.max_results);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AggregationConfig, Config, OutputConfig, ScholarConfig, ServerConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
