//! Statistics about what the resume store already holds
//!
//! This module provides functionality for listing stored years and their
//! document counts without touching the network.

use crate::state::Collection;
use crate::storage::{ResumeStore, StoreResult};
use std::collections::BTreeMap;

/// Stored-year summary for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStatistics {
    pub collection: Collection,

    /// Document count per stored year
    pub documents_by_year: BTreeMap<u16, usize>,
}

impl StoreStatistics {
    pub fn total_documents(&self) -> usize {
        self.documents_by_year.values().sum()
    }

    /// Years in `start..=end` that have no stored index
    pub fn missing_years(&self, start: u16, end: u16) -> Vec<u16> {
        (start..=end)
            .filter(|year| !self.documents_by_year.contains_key(year))
            .collect()
    }
}

/// Loads statistics from the resume store
pub fn load_statistics<S: ResumeStore + ?Sized>(
    store: &S,
    collection: &Collection,
) -> StoreResult<StoreStatistics> {
    let mut documents_by_year = BTreeMap::new();

    for year in store.stored_years(collection)? {
        if let Some(index) = store.load(collection, year)? {
            documents_by_year.insert(year, index.len());
        }
    }

    Ok(StoreStatistics {
        collection: collection.clone(),
        documents_by_year,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &StoreStatistics) {
    println!("=== Stored Years: {} ===\n", stats.collection);

    if stats.documents_by_year.is_empty() {
        println!("No years stored yet.");
        return;
    }

    for (year, count) in &stats.documents_by_year {
        println!("  {}: {} documents", year, count);
    }

    println!(
        "\nTotal: {} documents across {} years",
        stats.total_documents(),
        stats.documents_by_year.len()
    );
}
