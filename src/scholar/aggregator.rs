//! Paginated aggregation - the main scrape orchestration logic
//!
//! One aggregation run pages through the publication list, merges pages
//! while de-duplicating by title, then fetches the profile header and
//! replaces the stored snapshot.

use crate::config::AggregationConfig;
use crate::model::{ProfileSummary, Publication};
use crate::scholar::delay::PageDelay;
use crate::scholar::source::PublicationSource;
use crate::storage::SnapshotStore;
use crate::Result;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

/// Pagination settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationSettings {
    /// Rows requested per page; also the offset step
    pub page_size: usize,

    /// Target number of publications
    pub max_results: usize,
}

impl From<&AggregationConfig> for AggregationSettings {
    fn from(config: &AggregationConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_results: config.max_results,
        }
    }
}

/// Runs aggregation against an injected source and snapshot store
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn PublicationSource>,
    store: Arc<dyn SnapshotStore>,
    settings: AggregationSettings,
    delay: PageDelay,
}

impl Aggregator {
    /// Creates a new aggregator
    ///
    /// # Arguments
    ///
    /// * `source` - Where pages and the profile header come from
    /// * `store` - Where the snapshot is written on success
    /// * `settings` - Page size and cap
    /// * `delay` - Pause between page fetches
    pub fn new(
        source: Arc<dyn PublicationSource>,
        store: Arc<dyn SnapshotStore>,
        settings: AggregationSettings,
        delay: PageDelay,
    ) -> Self {
        Self {
            source,
            store,
            settings,
            delay,
        }
    }

    /// Collects publications page by page
    ///
    /// The cap is checked before each fetch only, so the result can exceed
    /// `max_results` by up to one page. The loop ends early when a page is
    /// empty or adds no unseen title. Any fetch error aborts the run.
    pub async fn collect_publications(&self) -> Result<Vec<Publication>> {
        let AggregationSettings {
            page_size,
            max_results,
        } = self.settings;

        let mut publications: Vec<Publication> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut offset = 0;

        while publications.len() < max_results {
            let page = self.source.fetch_page(offset, page_size).await?;
            if page.is_empty() {
                tracing::info!("Empty page at offset {}, end of list", offset);
                break;
            }

            let before = publications.len();
            for publication in page {
                if seen.insert(publication.title.clone()) {
                    publications.push(publication);
                }
            }
            tracing::info!("Scraped {} unique articles so far...", publications.len());

            if publications.len() == before {
                tracing::info!("No new articles at offset {}, end of list", offset);
                break;
            }

            offset += page_size;
            self.delay.pause().await;
        }

        Ok(publications)
    }

    /// Runs a full aggregation and replaces the stored snapshot
    ///
    /// Nothing is written unless every page and the profile header were
    /// fetched successfully.
    pub async fn run(&self) -> Result<ProfileSummary> {
        tracing::info!("Starting Google Scholar scraping...");

        let publications = self.collect_publications().await?;
        let header = self.source.fetch_profile().await?;
        let summary = ProfileSummary::new(header, publications, Utc::now());

        tracing::info!("Saving data to snapshot...");
        self.store.save(&summary).await?;

        tracing::info!(
            "Scraped {} unique articles for {}",
            summary.publications.len(),
            summary.name
        );
        Ok(summary)
    }
}
