//! Output module for reporting crawl results
//!
//! This module handles everything shown to the operator after a run:
//! - Run summaries (resumed vs. crawled years, failures with context)
//! - The combined year → URLs JSON object
//! - Statistics about years already held by the resume store

mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, StoreStatistics};
pub use summary::{format_run_summary, print_run_summary, write_outcome_json};
