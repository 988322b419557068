//! The narrow seam between the aggregation loop and Scholar itself

use crate::config::Config;
use crate::model::{ProfileHeader, Publication};
use crate::scholar::fetcher::{build_http_client, fetch_document};
use crate::scholar::parser::{parse_profile, parse_publications};
use crate::{Result, ScholarError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Anything that can hand back pages of publications and a profile header
///
/// The aggregator only sees this trait, so markup changes (or a test
/// double) never touch the pagination logic.
#[async_trait]
pub trait PublicationSource: Send + Sync {
    /// Fetches one page of publications starting at `offset`
    async fn fetch_page(&self, offset: usize, page_size: usize) -> Result<Vec<Publication>>;

    /// Fetches the profile header (name, affiliation, metrics)
    async fn fetch_profile(&self) -> Result<ProfileHeader>;
}

/// Live Google Scholar profile
#[derive(Debug, Clone)]
pub struct ScholarSource {
    client: Client,
    base_url: Url,
    user_id: String,
    language: String,
}

impl ScholarSource {
    /// Creates a source for the profile described in `config`
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.scholar.request_timeout_secs);
        let client =
            build_http_client(&config.user_agent, timeout).map_err(ScholarError::Client)?;
        Self::with_client(
            client,
            &config.scholar.base_url,
            &config.scholar.user_id,
            &config.scholar.language,
        )
    }

    /// Creates a source using an already-built client
    pub fn with_client(client: Client, base_url: &str, user_id: &str, language: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            user_id: user_id.to_string(),
            language: language.to_string(),
        })
    }

    fn profile_url(&self) -> Result<Url> {
        let mut url = self.base_url.join("/citations")?;
        url.query_pairs_mut()
            .append_pair("hl", &self.language)
            .append_pair("user", &self.user_id);
        Ok(url)
    }

    /// URL of the publication list, newest first
    pub fn page_url(&self, offset: usize, page_size: usize) -> Result<Url> {
        let mut url = self.profile_url()?;
        url.query_pairs_mut()
            .append_pair("view_op", "list_works")
            .append_pair("sortby", "pubdate")
            .append_pair("cstart", &offset.to_string())
            .append_pair("pagesize", &page_size.to_string());
        Ok(url)
    }
}

#[async_trait]
impl PublicationSource for ScholarSource {
    async fn fetch_page(&self, offset: usize, page_size: usize) -> Result<Vec<Publication>> {
        let url = self.page_url(offset, page_size)?;
        tracing::info!("Fetching publications {}..{}", offset, offset + page_size);

        let body = fetch_document(&self.client, url.as_str()).await?;
        parse_publications(&body)
    }

    async fn fetch_profile(&self) -> Result<ProfileHeader> {
        let url = self.profile_url()?;
        tracing::info!("Fetching profile data...");

        let body = fetch_document(&self.client, url.as_str()).await?;
        parse_profile(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> ScholarSource {
        ScholarSource::with_client(
            Client::new(),
            "https://scholar.google.com.br",
            "RgcMUu4AAAAJ",
            "en",
        )
        .unwrap()
    }

    #[test]
    fn test_page_url() {
        let url = source().page_url(200, 100).unwrap();
        assert_eq!(
            url.as_str(),
            "https://scholar.google.com.br/citations?hl=en&user=RgcMUu4AAAAJ&view_op=list_works&sortby=pubdate&cstart=200&pagesize=100"
        );
    }

    #[test]
    fn test_profile_url() {
        let url = source().profile_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://scholar.google.com.br/citations?hl=en&user=RgcMUu4AAAAJ"
        );
    }

    #[test]
    fn test_client_build_failure_is_client_error() {
        let mut config: Config = toml::from_str("[scholar]\nuser-id = \"RgcMUu4AAAAJ\"\n").unwrap();
        config.user_agent.crawler_name = "Bad\nName".to_string();

        let result = ScholarSource::new(&config);
        assert!(matches!(result, Err(ScholarError::Client(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ScholarSource::with_client(Client::new(), "not a url", "id", "en");
        assert!(result.is_err());
    }
}
