//! HTTP fetcher implementation
//!
//! This module handles all outbound requests to Scholar:
//! - Building the HTTP client with a proper user agent string
//! - Plain GET requests returning the page body
//! - Classifying failures into `ScholarError` variants
//!
//! There is no retry here. A failed page aborts the whole aggregation run.

use crate::config::UserAgentConfig;
use crate::{Result, ScholarError};
use reqwest::Client;
use std::time::Duration;

/// Formats the user agent string sent with every request
///
/// Format: `Name/Version (+ContactURL; ContactEmail)`
pub fn user_agent_string(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use scholar_snapshot::config::UserAgentConfig;
/// use scholar_snapshot::scholar::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent_string(config))
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body as text
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(body)` |
/// | Any other status | `ScholarError::Status` |
/// | Transport failure or unreadable body | `ScholarError::Http` |
pub async fn fetch_document(client: &Client, url: &str) -> Result<String> {
    tracing::debug!("Fetching URL: {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| ScholarError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScholarError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| ScholarError::Http {
        url: url.to_string(),
        source,
    })
}
