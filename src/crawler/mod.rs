//! Crawler module for page fetching and crawl coordination
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Request scheduling, duplicate filtering and politeness delay
//! - Overall crawl coordination and statistics

mod coordinator;
mod fetcher;
mod scheduler;
mod stats;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_text, fetch_url, FetchResult};
pub use scheduler::{CrawlRequest, RequestKind, Scheduler};
pub use stats::CrawlStats;

use crate::config::Config;
use crate::ScraperError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the item store and register a run
/// 2. Fetch robots.txt for the start URL's origin
/// 3. Walk the index page and every chapter page
/// 4. Download, finalize and store every subchapter item
pub async fn crawl(config: Config, config_hash: &str) -> Result<CrawlStats, ScraperError> {
    run_crawl(config, config_hash).await
}
