//! Configuration module for Kanoon-Indexer
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every table has defaults, so a missing file means "use the public site".
//!
//! # Example
//!
//! ```no_run
//! use kanoon_indexer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("indexer.toml")).unwrap();
//! println!("Pagination limit: {}", config.crawler.pagination_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
