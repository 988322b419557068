use serde::Deserialize;

/// Main configuration structure for Scholar-Snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub scholar: ScholarConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener to
    #[serde(rename = "bind-address", default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin prefixes accepted by the cross-origin guard
    #[serde(
        rename = "allowed-origin-prefixes",
        default = "default_allowed_origin_prefixes"
    )]
    pub allowed_origin_prefixes: Vec<String>,
}

/// Which Scholar profile to scrape, and where
#[derive(Debug, Clone, Deserialize)]
pub struct ScholarConfig {
    /// Scheme and host of the Scholar mirror (no trailing path)
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// The `user=` identifier of the profile
    #[serde(rename = "user-id")]
    pub user_id: String,

    /// Interface language passed as `hl=`
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Pagination and back-off settings for an aggregation run
#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    /// Rows requested per page (`pagesize=`)
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: usize,

    /// Target number of publications; checked before each page fetch
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: usize,

    /// Lower bound of the pause between pages (milliseconds)
    #[serde(rename = "min-delay-ms", default = "default_min_delay")]
    pub min_delay_ms: u64,

    /// Upper bound (exclusive) of the pause between pages (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay")]
    pub max_delay_ms: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON snapshot file
    #[serde(rename = "snapshot-path", default = "default_snapshot_path")]
    pub snapshot_path: String,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origin_prefixes() -> Vec<String> {
    vec!["http://localhost:".to_string()]
}

fn default_base_url() -> String {
    "https://scholar.google.com.br".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> usize {
    100
}

fn default_max_results() -> usize {
    300
}

fn default_min_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    3000
}

fn default_snapshot_path() -> String {
    "./scholar_data.json".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            allowed_origin_prefixes: default_allowed_origin_prefixes(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_results: default_max_results(),
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "ScholarSnapshot".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}
