//! Crawler module for listing traversal
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching with retry for transient failures
//! - Typed link extraction from listing pages
//! - The category → year → month → page coordinator

mod coordinator;
mod fetcher;
mod navigator;
mod outcome;
mod throttle;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, Fetcher, ParsedDocument};
pub use navigator::{document_prefix, extract_links, DocumentLinks, Link, Navigator, YearLink};
pub use outcome::{CrawlOutcome, CrawlStatus, YearFailure};
pub use throttle::Throttle;

use crate::config::Config;
use crate::state::{Collection, YearRange};
use crate::IndexerError;

/// Runs a complete crawl for one collection
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the JSON resume store
/// 2. Find the collection's category on the root listing
/// 3. Resume stored years and crawl the rest month by month
/// 4. Persist each completed year
pub async fn crawl(
    config: Config,
    collection: &Collection,
    years: YearRange,
) -> Result<CrawlOutcome, IndexerError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run(collection, years).await
}
