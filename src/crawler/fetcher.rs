//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building one keep-alive HTTP client per run with a proper user agent
//! - Enforcing the politeness delay before every request
//! - Retrying transient network failures with linear backoff
//! - Classifying failures into transient and HTTP status errors

use crate::config::{Config, CrawlerConfig, UserAgentConfig};
use crate::crawler::throttle::Throttle;
use crate::IndexerError;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// A fetched page parsed into an HTML tree
pub struct ParsedDocument {
    url: Url,
    html: Html,
}

impl ParsedDocument {
    /// Parses a response body fetched from `url`
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use kanoon_indexer::config::Config;
/// use kanoon_indexer::crawler::build_http_client;
///
/// let config = Config::default();
/// let client = build_http_client(&config.user_agent, &config.crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited GET fetcher owning the run's connection pool
///
/// Only one request is ever in flight; the politeness delay is a pause on
/// the caller's task.
pub struct Fetcher {
    client: Client,
    throttle: Throttle,
    config: CrawlerConfig,
    requests_made: u64,
}

impl Fetcher {
    /// Creates a fetcher with a fresh client built from the configuration
    pub fn new(config: &Config) -> Result<Self, IndexerError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        Ok(Self::with_client(client, &config.crawler))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &CrawlerConfig) -> Self {
        Self {
            client,
            throttle: Throttle::new(config.politeness_delay()),
            config: config.clone(),
            requests_made: 0,
        }
    }

    /// Number of HTTP requests issued so far, retries included
    pub fn requests_made(&self) -> u64 {
        self.requests_made
    }

    /// Fetches and parses a page
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Connect error / timeout / body read | Retry up to `max_retries`, then `TransientNetwork` |
    /// | Non-2xx status | Immediate `HttpStatus` |
    /// | Other client errors | Immediate `HttpClient` |
    ///
    /// Every attempt, retries included, waits out the politeness delay first.
    pub async fn fetch(&mut self, url: &Url) -> Result<ParsedDocument, IndexerError> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url).await {
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let backoff = self.config.retry_backoff(attempt);
                    tracing::warn!(
                        "{} (attempt {}/{}), retrying in {:?}",
                        e,
                        attempt,
                        self.config.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
                result => return result,
            }
        }
    }

    async fn fetch_once(&mut self, url: &Url) -> Result<ParsedDocument, IndexerError> {
        self.throttle.wait().await;

        tracing::debug!("GET {}", url);
        self.requests_made += 1;
        let result = get_body(&self.client, url).await;
        self.throttle.mark_finished();

        let body = result?;
        Ok(ParsedDocument::parse(url.clone(), &body))
    }
}

/// Sends one GET request and returns the body of a 2xx response
async fn get_body(client: &Client, url: &Url) -> Result<String, IndexerError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(IndexerError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| classify_error(url, e))
}

/// Maps a reqwest error onto the transient / non-transient split
fn classify_error(url: &Url, e: reqwest::Error) -> IndexerError {
    if e.is_timeout() {
        IndexerError::TransientNetwork {
            url: url.to_string(),
            message: "Request timeout".to_string(),
        }
    } else if e.is_connect() {
        IndexerError::TransientNetwork {
            url: url.to_string(),
            message: "Connection failed".to_string(),
        }
    } else if e.is_request() || e.is_body() || e.is_decode() {
        IndexerError::TransientNetwork {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        IndexerError::HttpClient(e)
    }
}
