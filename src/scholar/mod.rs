//! Scholar module for fetching and aggregating profile data
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching of profile and publication pages
//! - HTML parsing of the publication table and profile header
//! - The politeness delay between pages
//! - The paginated aggregation loop

mod aggregator;
mod delay;
mod fetcher;
mod parser;
mod source;

pub use aggregator::{AggregationSettings, Aggregator};
pub use delay::PageDelay;
pub use fetcher::{build_http_client, fetch_document, user_agent_string};
pub use parser::{parse_profile, parse_publications};
pub use source::{PublicationSource, ScholarSource};

use crate::config::Config;
use crate::storage::SnapshotStore;
use crate::Result;
use std::sync::Arc;

/// Builds an aggregator wired to the live Scholar profile in `config`
///
/// # Arguments
///
/// * `config` - The service configuration
/// * `store` - The snapshot store the run will write to
pub fn aggregator_from_config(config: &Config, store: Arc<dyn SnapshotStore>) -> Result<Aggregator> {
    let source = ScholarSource::new(config)?;
    Ok(Aggregator::new(
        Arc::new(source),
        store,
        AggregationSettings::from(&config.aggregation),
        PageDelay::from_config(&config.aggregation),
    ))
}
