//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Collection`, `CollectionKind`, `YearRange`: what the caller asked to crawl
//! - `CrawlPhase`: the coordinator's position in the category → year → month → page walk
//! - `PageCursor`: transient page position within one month

mod collection;
mod cursor;
mod phase;

// Re-export main types
pub use collection::{Collection, CollectionKind, YearRange, YearRangeError};
pub use cursor::PageCursor;
pub use phase::CrawlPhase;
