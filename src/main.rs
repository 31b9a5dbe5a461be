//! Law-Scraper main entry point
//!
//! This is the command-line interface for the statutes crawler.

use anyhow::{bail, Context as _};
use clap::Parser;
use law_scraper::config::{load_config_with_hash, Config};
use law_scraper::crawler::crawl;
use law_scraper::output::{load_statistics, print_statistics};
use law_scraper::storage::SqliteStorage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Law-Scraper: a polite statutes crawler
///
/// Law-Scraper walks the statutes index (titles, chapters, subchapters),
/// downloads every subchapter PDF and records where each file was stored.
#[derive(Parser, Debug)]
#[command(name = "law-scraper")]
#[command(version)]
#[command(about = "A polite statutes crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for the latest run from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("law_scraper=info,warn"),
            1 => EnvFilter::new("law_scraper=debug,info"),
            2 => EnvFilter::new("law_scraper=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Law-Scraper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    if config.crawler.allowed_domains.is_empty() {
        println!("  Allowed domains: any");
    } else {
        println!(
            "  Allowed domains: {}",
            config.crawler.allowed_domains.join(", ")
        );
    }
    println!("  Download delay: {}ms", config.crawler.download_delay);
    println!("  Obey robots.txt: {}", config.crawler.obey_robots);
    println!("  Missing href policy: {:?}", config.crawler.missing_href);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Files store: {}", config.files.store);
    println!("  Database: {}", config.output.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.database_path);
    if !path.exists() {
        bail!("database {} does not exist yet", path.display());
    }

    println!("Database: {}\n", path.display());

    let storage = SqliteStorage::new(path).context("opening database")?;
    match load_statistics(&storage).context("loading statistics")? {
        Some(stats) => print_statistics(&stats),
        None => println!("No crawl runs recorded"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Starting crawl at {} (files stored under {})",
        config.crawler.start_url,
        config.files.store
    );

    let stats = crawl(config, config_hash).await.context("crawl")?;
    tracing::info!(
        "Crawl completed successfully: {} of {} PDFs stored",
        stats.downloads_succeeded,
        stats.items_scraped
    );

    Ok(())
}
