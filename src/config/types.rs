use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Kanoon-Indexer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Shape of the remote listing
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Scheme and host every listing and document URL is built on
    pub base_url: String,

    /// Root listing for courts
    pub court_listing_path: String,

    /// Root listing for acts
    pub act_listing_path: String,

    /// Href prefix shared by category and year links
    pub browse_prefix: String,

    /// Href prefix of month search links
    pub search_prefix: String,

    /// Text of the month link covering the whole year
    pub whole_year_label: String,

    /// Query parameter carrying the page number
    pub page_param: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://indiankanoon.org".to_string(),
            court_listing_path: "/browse/".to_string(),
            act_listing_path: "/browselaws/".to_string(),
            browse_prefix: "/browse".to_string(),
            search_prefix: "/search/?".to_string(),
            whole_year_label: "Entire Year".to_string(),
            page_param: "pagenum".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Minimum time between the end of one request and the start of the next (milliseconds)
    pub politeness_delay_ms: u64,

    /// Hard ceiling on page numbers per month
    pub pagination_limit: u32,

    /// Whole-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Extra attempts after a transient network failure
    pub max_retries: u32,

    /// Base backoff between retries (milliseconds), multiplied by the attempt number
    pub retry_backoff_ms: u64,
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn retry_backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            politeness_delay_ms: 1000,
            pagination_limit: 1000,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: 2,
            retry_backoff_ms: 2000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the header value as `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "KanoonIndexer".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://indiankanoon.org".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Root directory of the per-year link files
    pub links_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            links_dir: PathBuf::from("../links"),
        }
    }
}
