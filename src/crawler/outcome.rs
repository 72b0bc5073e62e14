//! Result of one crawl run

use crate::state::{Collection, YearRange};
use crate::storage::YearIndex;
use crate::IndexerError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// How a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlStatus {
    /// Every requested year found on the listing was resumed or crawled
    Completed,

    /// At least one year failed and was not persisted
    CompletedWithFailures,

    /// No category link matched the collection name; nothing was produced
    CategoryNotFound,

    /// The cancel flag was raised between pages
    Cancelled,
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::CompletedWithFailures => write!(f, "completed with failures"),
            Self::CategoryNotFound => write!(f, "category not found"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A year whose crawl was abandoned, with enough context to resume by hand
#[derive(Debug)]
pub struct YearFailure {
    pub collection: Collection,
    pub year: u16,
    /// Month href being walked when the error happened
    pub month: Option<String>,
    /// Page number being fetched when the error happened
    pub page: Option<u32>,
    pub error: IndexerError,
}

impl YearFailure {
    pub fn new(collection: &Collection, year: u16, error: IndexerError) -> Self {
        Self {
            collection: collection.clone(),
            year,
            month: None,
            page: None,
            error,
        }
    }

    pub fn at_page(mut self, month: &str, page: u32) -> Self {
        self.month = Some(month.to_string());
        self.page = Some(page);
        self
    }
}

impl fmt::Display for YearFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} year {}", self.collection, self.year)?;
        if let Some(month) = &self.month {
            write!(f, " month {}", month)?;
        }
        if let Some(page) = self.page {
            write!(f, " page {}", page)?;
        }
        write!(f, ": {}", self.error)
    }
}

/// Everything a crawl run produced
#[derive(Debug)]
pub struct CrawlOutcome {
    pub collection: Collection,
    pub range: YearRange,
    pub status: CrawlStatus,
    /// Every resumed or freshly crawled year
    pub years: BTreeMap<u16, YearIndex>,
    /// Years reused from the resume store without any request
    pub resumed: Vec<u16>,
    /// Years crawled and persisted during this run
    pub crawled: Vec<u16>,
    pub failures: Vec<YearFailure>,
    /// Document links skipped for lacking an id
    pub skipped_links: usize,
    /// HTTP requests issued by this run
    pub requests: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlOutcome {
    pub fn new(collection: Collection, range: YearRange) -> Self {
        Self {
            collection,
            range,
            status: CrawlStatus::Completed,
            years: BTreeMap::new(),
            resumed: Vec::new(),
            crawled: Vec::new(),
            failures: Vec::new(),
            skipped_links: 0,
            requests: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_resumed(&mut self, index: YearIndex) {
        self.resumed.push(index.year());
        self.years.insert(index.year(), index);
    }

    pub fn record_crawled(&mut self, index: YearIndex) {
        self.crawled.push(index.year());
        self.years.insert(index.year(), index);
    }

    pub fn record_failure(&mut self, failure: YearFailure) {
        tracing::error!("Year failed: {}", failure);
        self.failures.push(failure);
    }

    /// Stamps the end time and settles the final status
    pub fn finish(&mut self, requests: u64) {
        self.requests = requests;
        self.finished_at = Some(Utc::now());

        if self.status == CrawlStatus::Completed && !self.failures.is_empty() {
            self.status = CrawlStatus::CompletedWithFailures;
        }
    }

    /// Total documents across every year in the outcome
    pub fn total_documents(&self) -> usize {
        self.years.values().map(YearIndex::len).sum()
    }

    /// The `{"2020": [urls...]}` mapping handed to the PDF downloader
    pub fn to_json_map(&self) -> BTreeMap<String, Vec<String>> {
        self.years
            .iter()
            .map(|(year, index)| (year.to_string(), index.urls().to_vec()))
            .collect()
    }
}
