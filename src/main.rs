//! Kanoon-Indexer main entry point
//!
//! This is the command-line interface for the legal-document link crawler.

use anyhow::{bail, Context};
use clap::Parser;
use kanoon_indexer::config::{load_config_with_hash, validate, Config};
use kanoon_indexer::crawler::{Coordinator, CrawlStatus};
use kanoon_indexer::output::{load_statistics, print_run_summary, print_statistics, write_outcome_json};
use kanoon_indexer::state::{Collection, CollectionKind, YearRange};
use kanoon_indexer::storage::JsonResumeStore;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing_subscriber::EnvFilter;

/// Kanoon-Indexer: incremental legal-document link crawler
///
/// Walks the browse listing of a court or act year by year, month by month,
/// and saves the discovered document URLs as one JSON file per year. Years
/// that already have a file are never crawled again.
#[derive(Parser, Debug)]
#[command(name = "kanoon-indexer")]
#[command(version)]
#[command(about = "Incremental legal-document link crawler", long_about = None)]
struct Cli {
    /// Type of collection to crawl
    #[arg(long = "type", value_enum)]
    kind: CollectionKind,

    /// Name of the court or act, exactly as shown on the listing
    #[arg(long)]
    name: String,

    /// First year to crawl
    #[arg(long)]
    start_year: u16,

    /// Last year to crawl (inclusive)
    #[arg(long)]
    end_year: u16,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the site base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the delay between requests, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Override the maximum page number per month
    #[arg(long)]
    pagination_limit: Option<u32>,

    /// Override the directory holding the per-year link files
    #[arg(long)]
    links_dir: Option<PathBuf>,

    /// Also write the combined {"year": [urls]} object to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration and targets without crawling
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// Show the years already stored for this collection and exit
    #[arg(long, conflicts_with = "dry_run")]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let collection = Collection::new(cli.name.clone(), cli.kind);
    let years = YearRange::new(cli.start_year, cli.end_year).context("Invalid year range")?;

    if cli.dry_run {
        handle_dry_run(&config, &collection, years)
    } else if cli.status {
        handle_status(&config, &collection, years)
    } else {
        handle_crawl(config, &collection, years, cli.output.as_deref()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kanoon_indexer=info,warn"),
            1 => EnvFilter::new("kanoon_indexer=debug,info"),
            2 => EnvFilter::new("kanoon_indexer=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.site.base_url = base_url.clone();
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.politeness_delay_ms = delay_ms;
    }
    if let Some(limit) = cli.pagination_limit {
        config.crawler.pagination_limit = limit;
    }
    if let Some(links_dir) = &cli.links_dir {
        config.output.links_dir = links_dir.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, collection: &Collection, years: YearRange) -> anyhow::Result<()> {
    let store = JsonResumeStore::new(config.output.links_dir.clone());
    let listing_path = match collection.kind {
        CollectionKind::Court => &config.site.court_listing_path,
        CollectionKind::Act => &config.site.act_listing_path,
    };

    println!("=== Kanoon-Indexer Dry Run ===\n");

    println!("Target:");
    println!("  Collection: {}", collection);
    println!("  Years: {} ({} years)", years, years.year_count());
    println!("  Listing: {}{}", config.site.base_url.trim_end_matches('/'), listing_path);

    println!("\nCrawler:");
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);
    println!("  Pagination limit: {}", config.crawler.pagination_limit);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", store.collection_dir(collection).display());

    Ok(())
}

/// Handles the --status mode: shows stored years without any network access
fn handle_status(config: &Config, collection: &Collection, years: YearRange) -> anyhow::Result<()> {
    let store = JsonResumeStore::new(config.output.links_dir.clone());
    let stats = load_statistics(&store, collection)?;

    print_statistics(&stats);

    let missing = stats.missing_years(years.start(), years.end());
    if missing.is_empty() {
        println!("\nEvery year in {} is stored.", years);
    } else {
        println!("\nNot yet stored in {}: {:?}", years, missing);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    collection: &Collection,
    years: YearRange,
    output: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config)?;

    // Ctrl-C stops the crawl at the next page boundary
    let cancel = coordinator.cancel_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            cancel.store(true, Ordering::Relaxed);
        }
    });

    let outcome = match coordinator.run(collection, years).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    print_run_summary(&outcome);

    if let Some(path) = output {
        write_outcome_json(&outcome, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote year mapping to {}", path.display());
    }

    match outcome.status {
        CrawlStatus::Completed => Ok(()),
        CrawlStatus::CategoryNotFound => {
            tracing::warn!("No listing entry named '{}'", collection.name);
            Ok(())
        }
        CrawlStatus::CompletedWithFailures => {
            bail!("{} year(s) failed; rerun to retry them", outcome.failures.len())
        }
        CrawlStatus::Cancelled => bail!("Crawl cancelled; completed years were kept"),
    }
}
