//! Run summary output
//!
//! Prints what a crawl run did and writes the combined year → URLs mapping.

use crate::crawler::CrawlOutcome;
use crate::storage::{write_atomic, StoreResult};
use std::path::Path;

/// Writes the outcome's `{"year": [urls]}` object as compact JSON
///
/// The write is atomic, like the per-year files.
pub fn write_outcome_json(outcome: &CrawlOutcome, path: &Path) -> StoreResult<()> {
    let json = serde_json::to_string(&outcome.to_json_map())?;
    write_atomic(path, json.as_bytes())
}

/// Renders a human-readable summary of a crawl run
pub fn format_run_summary(outcome: &CrawlOutcome) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Crawl Summary: {} ===\n\n", outcome.collection));
    out.push_str(&format!("Status: {}\n", outcome.status));
    out.push_str(&format!("Years requested: {}\n", outcome.range));

    if let Some(finished) = outcome.finished_at {
        let elapsed = finished - outcome.started_at;
        out.push_str(&format!(
            "Duration: {}s ({} requests)\n",
            elapsed.num_seconds(),
            outcome.requests
        ));
    }

    out.push('\n');
    for (year, index) in &outcome.years {
        let source = if outcome.resumed.contains(year) {
            "resumed"
        } else {
            "crawled"
        };
        out.push_str(&format!(
            "  {}: {} documents ({})\n",
            year,
            index.len(),
            source
        ));
    }

    if !outcome.failures.is_empty() {
        out.push_str("\nFailed years (not persisted):\n");
        for failure in &outcome.failures {
            out.push_str(&format!("  {}\n", failure));
        }
    }

    if outcome.skipped_links > 0 {
        out.push_str(&format!(
            "\nSkipped {} links without a document id\n",
            outcome.skipped_links
        ));
    }

    out.push_str(&format!(
        "\nTotal: {} documents\n",
        outcome.total_documents()
    ));

    out
}

/// Prints the run summary to stdout
pub fn print_run_summary(outcome: &CrawlOutcome) {
    print!("{}", format_run_summary(outcome));
}
