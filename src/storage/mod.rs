//! Storage module for persisting discovered document links
//!
//! This module handles the per-year resume store, including:
//! - The `YearIndex` entity and its on-disk JSON form
//! - The `ResumeStore` trait and its JSON-file implementation
//! - Atomic (temp file + rename) writes

mod json;
mod traits;

pub use json::{write_atomic, JsonResumeStore};
pub use traits::{ResumeStore, StoreError, StoreResult};

use crate::url::DocumentReference;

/// Ordered document URLs discovered for one collection-year
///
/// Created empty when a year's crawl starts, appended to page by page,
/// and persisted once when every month is exhausted. Duplicates across
/// months are kept as listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearIndex {
    year: u16,
    urls: Vec<String>,
}

impl YearIndex {
    pub fn new(year: u16) -> Self {
        Self {
            year,
            urls: Vec::new(),
        }
    }

    /// Wraps URLs read back from storage without touching them
    pub fn from_urls(year: u16, urls: Vec<String>) -> Self {
        Self { year, urls }
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn push(&mut self, document: DocumentReference) {
        self.urls.push(document.into_string());
    }

    pub fn extend(&mut self, documents: impl IntoIterator<Item = DocumentReference>) {
        self.urls
            .extend(documents.into_iter().map(DocumentReference::into_string));
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Compact JSON array of the URLs, the format the PDF downloader reads
    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(&self.urls)?)
    }
}
