//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the state machine that walks
//! category → year → month → page for one collection, including:
//! - Skipping years already held by the resume store
//! - Walking month pages until an empty page or the pagination limit
//! - Persisting each year exactly once, after all of its months are done
//! - Isolating per-year failures so later years still run
//! - Cooperative cancellation between pages

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::navigator::{Link, Navigator, YearLink};
use crate::crawler::outcome::{CrawlOutcome, CrawlStatus, YearFailure};
use crate::state::{Collection, CollectionKind, CrawlPhase, PageCursor, YearRange};
use crate::storage::{JsonResumeStore, ResumeStore, YearIndex};
use crate::url::resolve;
use crate::IndexerError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator<S: ResumeStore = JsonResumeStore> {
    config: Config,
    base: Url,
    fetcher: Fetcher,
    navigator: Navigator,
    store: S,
    cancel: Arc<AtomicBool>,
    phase: CrawlPhase,
    skipped_links: usize,
}

impl Coordinator<JsonResumeStore> {
    /// Creates a coordinator writing year files under `config.output.links_dir`
    pub fn new(config: Config) -> Result<Self, IndexerError> {
        let store = JsonResumeStore::new(config.output.links_dir.clone());
        Self::with_store(config, store)
    }
}

impl<S: ResumeStore> Coordinator<S> {
    /// Creates a coordinator around an explicit resume store
    pub fn with_store(config: Config, store: S) -> Result<Self, IndexerError> {
        crate::config::validate(&config)?;

        let base = Url::parse(&config.site.base_url)?;
        let fetcher = Fetcher::new(&config)?;
        let navigator = Navigator::new(config.site.clone(), base.clone());

        Ok(Self {
            config,
            base,
            fetcher,
            navigator,
            store,
            cancel: Arc::new(AtomicBool::new(false)),
            phase: CrawlPhase::SelectCategory,
            skipped_links: 0,
        })
    }

    /// Flag that, once set, stops the crawl at the next page boundary
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// HTTP requests issued over the coordinator's lifetime
    pub fn requests_made(&self) -> u64 {
        self.fetcher.requests_made()
    }

    /// URL of the root listing for a collection kind
    pub fn listing_url(&self, kind: CollectionKind) -> Result<Url, IndexerError> {
        let path = match kind {
            CollectionKind::Court => &self.config.site.court_listing_path,
            CollectionKind::Act => &self.config.site.act_listing_path,
        };
        Ok(resolve(&self.base, path)?)
    }

    /// Crawls every requested year of a collection
    ///
    /// Years already in the resume store are returned as stored without any
    /// request. Hard errors while selecting the category or its years end the
    /// run with `Err`; errors inside a year are recorded as failures on the
    /// outcome and the next year is attempted.
    pub async fn run(
        &mut self,
        collection: &Collection,
        years: YearRange,
    ) -> Result<CrawlOutcome, IndexerError> {
        self.phase = CrawlPhase::SelectCategory;
        self.skipped_links = 0;
        let requests_before = self.fetcher.requests_made();
        let mut outcome = CrawlOutcome::new(collection.clone(), years);

        tracing::info!("Starting crawl of {} for years {}", collection, years);

        if let Some(stored) = self.load_all_stored(collection, years) {
            tracing::info!(
                "All {} requested years already stored; nothing to fetch",
                stored.len()
            );
            for index in stored {
                self.transition(CrawlPhase::ResumeHit)?;
                outcome.record_resumed(index);
            }
            self.transition(CrawlPhase::Done)?;
            outcome.finish(self.fetcher.requests_made() - requests_before);
            return Ok(outcome);
        }

        let Some(category) = self.select_category(collection).await? else {
            tracing::warn!("Category not found: {}", collection);
            self.transition(CrawlPhase::Done)?;
            outcome.status = CrawlStatus::CategoryNotFound;
            outcome.finish(self.fetcher.requests_made() - requests_before);
            return Ok(outcome);
        };

        self.transition(CrawlPhase::SelectYear)?;
        let category_url = resolve(&self.base, &category.href)?;
        let year_links = self
            .navigator
            .year_links(&self.fetcher.fetch(&category_url).await?, years);

        tracing::info!(
            "{} of the requested years are listed for {}",
            year_links.len(),
            collection
        );

        for year_link in &year_links {
            if self.is_cancelled() {
                outcome.status = CrawlStatus::Cancelled;
                break;
            }

            match self.store.load(collection, year_link.year) {
                Ok(Some(index)) => {
                    self.transition(CrawlPhase::ResumeHit)?;
                    tracing::info!(
                        "Year {} already stored ({} documents), skipping",
                        year_link.year,
                        index.len()
                    );
                    outcome.record_resumed(index);
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    outcome.record_failure(YearFailure::new(collection, year_link.year, e.into()));
                    continue;
                }
            }

            self.transition(CrawlPhase::CrawlYear)?;
            match self.crawl_year(collection, year_link).await {
                Ok(index) => {
                    self.transition(CrawlPhase::YearComplete)?;
                    tracing::info!(
                        "Completed year {} for {}: {} documents",
                        year_link.year,
                        collection,
                        index.len()
                    );
                    outcome.record_crawled(index);
                }
                Err(failure) => {
                    self.transition(CrawlPhase::YearAborted)?;
                    if matches!(failure.error, IndexerError::Cancelled) {
                        tracing::warn!("Cancelled during {}; year discarded", failure);
                        outcome.status = CrawlStatus::Cancelled;
                        break;
                    }
                    outcome.record_failure(failure);
                }
            }
        }

        self.transition(CrawlPhase::Done)?;
        outcome.skipped_links = self.skipped_links;
        outcome.finish(self.fetcher.requests_made() - requests_before);

        tracing::info!(
            "Crawl of {} {}: {} resumed, {} crawled, {} failed, {} requests",
            collection,
            outcome.status,
            outcome.resumed.len(),
            outcome.crawled.len(),
            outcome.failures.len(),
            outcome.requests
        );

        Ok(outcome)
    }

    /// Returns every year of the range when all of them are stored
    fn load_all_stored(&self, collection: &Collection, years: YearRange) -> Option<Vec<YearIndex>> {
        years
            .years()
            .map(|year| self.store.load(collection, year).ok().flatten())
            .collect()
    }

    async fn select_category(
        &mut self,
        collection: &Collection,
    ) -> Result<Option<Link>, IndexerError> {
        let listing = self.listing_url(collection.kind)?;
        let root = self.fetcher.fetch(&listing).await?;
        Ok(self.navigator.find_category(&root, &collection.name))
    }

    /// Walks every month of one year and persists the result
    ///
    /// Any error discards the partial index; nothing is written for the year.
    async fn crawl_year(
        &mut self,
        collection: &Collection,
        year_link: &YearLink,
    ) -> Result<YearIndex, YearFailure> {
        let year = year_link.year;
        let fail = |e: IndexerError| YearFailure::new(collection, year, e);

        self.transition(CrawlPhase::SelectMonth).map_err(fail)?;
        let year_url = resolve(&self.base, &year_link.href).map_err(|e| fail(e.into()))?;
        let months = self
            .navigator
            .month_links(&self.fetcher.fetch(&year_url).await.map_err(fail)?);

        tracing::info!("Year {}: {} months to walk", year, months.len());

        let mut index = YearIndex::new(year);
        for month in &months {
            self.crawl_month(collection, year, month, &mut index).await?;
        }

        self.store
            .save(collection, &index)
            .map_err(|e| fail(e.into()))?;

        Ok(index)
    }

    /// Fetches pages 0, 1, 2, ... of a month until one has no document links
    async fn crawl_month(
        &mut self,
        collection: &Collection,
        year: u16,
        month: &Link,
        index: &mut YearIndex,
    ) -> Result<(), YearFailure> {
        let limit = self.config.crawler.pagination_limit;
        let mut cursor = PageCursor::new(collection, year, &month.href);

        loop {
            let fail = |e: IndexerError| {
                YearFailure::new(collection, year, e).at_page(cursor.month_href(), cursor.page())
            };

            if self.is_cancelled() {
                return Err(fail(IndexerError::Cancelled));
            }

            if cursor.exhausted(limit) {
                tracing::warn!(
                    "Pagination limit {} reached for {}; moving on",
                    limit,
                    cursor
                );
                return Ok(());
            }

            self.transition(CrawlPhase::CrawlPage(cursor.page()))
                .map_err(fail)?;

            let url = cursor
                .url(&self.base, &self.config.site.page_param)
                .map_err(|e| fail(e.into()))?;
            let links = self.navigator.document_links(
                &self.fetcher.fetch(&url).await.map_err(fail)?,
                collection.kind,
            );

            if links.is_empty() {
                tracing::debug!("No documents on {}; month finished", cursor);
                return Ok(());
            }

            tracing::debug!(
                "{} documents on {} ({} skipped)",
                links.references.len(),
                cursor,
                links.skipped
            );
            self.skipped_links += links.skipped;
            index.extend(links.references);
            cursor.advance();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), IndexerError> {
        if !self.phase.can_transition_to(next) {
            return Err(IndexerError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}
