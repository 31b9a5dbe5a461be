//! Crawl coordinator
//!
//! Drives one run end to end: robots.txt, the index page, every chapter page,
//! and the download and completion of every subchapter item.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_text, FetchResult};
use crate::crawler::scheduler::{CrawlRequest, RequestKind, Scheduler};
use crate::crawler::stats::CrawlStats;
use crate::item::{DownloadStatus, WorkItem};
use crate::pipeline::{DownloadCompletionHandler, DownloadError, FileOutcome, FilesPipeline};
use crate::robots::{fetch_robots, ParsedRobots};
use crate::storage::{ItemStore, RunStatus, SqliteStorage};
use crate::url::is_allowed_domain;
use crate::walker::{IndexParse, Page, SiteWalker};
use crate::ScraperError;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main crawl coordinator
///
/// Requests are processed one at a time. A failed page is logged and
/// counted; storage failures abort the run.
pub struct Coordinator {
    config: Config,
    client: Client,
    walker: SiteWalker,
    scheduler: Scheduler,
    files: FilesPipeline,
    completion: DownloadCompletionHandler,
    storage: SqliteStorage,
    robots: ParsedRobots,
    run_id: i64,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a coordinator and registers a new run in the item store
    pub fn new(config: Config, config_hash: &str) -> Result<Self, ScraperError> {
        let client = build_http_client(&config.user_agent)?;
        let walker = SiteWalker::from_config(&config.crawler)?;
        let scheduler = Scheduler::new(Duration::from_millis(config.crawler.download_delay));
        let files = FilesPipeline::new(&config.files.store);
        let completion = DownloadCompletionHandler::from_config(&config.files);

        let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
        let run_id = storage.create_run(config_hash)?;
        tracing::info!("Starting new run {}", run_id);

        Ok(Self {
            config,
            client,
            walker,
            scheduler,
            files,
            completion,
            storage,
            robots: ParsedRobots::allow_all(),
            run_id,
            stats: CrawlStats::default(),
        })
    }

    /// The ID of the run this coordinator records items under
    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// Counters collected so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    fn robots_agent(&self) -> &str {
        &self.config.user_agent.crawler_name
    }

    /// Runs the crawl until the frontier is empty
    pub async fn run(&mut self) -> Result<CrawlStats, ScraperError> {
        let start_time = Instant::now();
        let start_url = self.walker.start_url().clone();

        if self.config.crawler.obey_robots {
            self.robots = fetch_robots(&self.client, &start_url).await;
            self.apply_crawl_delay();
        }

        self.schedule(CrawlRequest::index(start_url));

        while let Some(request) = self.scheduler.next_request().await {
            tracing::debug!("Processing URL: {}", request.url);

            match self.process_request(request).await {
                Ok(()) => {}
                Err(e @ ScraperError::PageFetch { .. }) => {
                    self.stats.page_errors += 1;
                    tracing::error!("{}", e);
                }
                Err(e @ ScraperError::Extract { .. }) => {
                    self.stats.extraction_errors += 1;
                    tracing::error!("{}", e);
                }
                Err(e) => {
                    tracing::error!("Aborting run {}: {}", self.run_id, e);
                    self.storage.finish_run(self.run_id, RunStatus::Failed)?;
                    return Err(e);
                }
            }
        }

        self.storage.finish_run(self.run_id, RunStatus::Completed)?;

        tracing::info!(
            "Crawl completed: {} pages fetched, {} items scraped in {:?}",
            self.stats.pages_fetched,
            self.stats.items_scraped,
            start_time.elapsed()
        );
        self.stats.log_summary();

        Ok(self.stats.clone())
    }

    /// Raises the politeness delay to robots.txt's `Crawl-delay` when larger
    fn apply_crawl_delay(&mut self) {
        let Some(seconds) = self.robots.crawl_delay(self.robots_agent()) else {
            return;
        };
        let Ok(delay) = Duration::try_from_secs_f64(seconds) else {
            tracing::warn!("Ignoring unusable Crawl-delay {}", seconds);
            return;
        };
        if delay > self.scheduler.delay() {
            tracing::info!("Using robots.txt Crawl-delay of {:?}", delay);
            self.scheduler.set_delay(delay);
        }
    }

    /// Applies the offsite, robots.txt and duplicate filters, then queues
    /// the request
    fn schedule(&mut self, request: CrawlRequest) -> bool {
        if !is_allowed_domain(&request.url, &self.config.crawler.allowed_domains) {
            tracing::debug!("Filtered offsite request to {}", request.url);
            self.stats.offsite_filtered += 1;
            return false;
        }

        if !self.robots.is_allowed(request.url.as_str(), self.robots_agent()) {
            tracing::info!("URL {} disallowed by robots.txt", request.url);
            self.stats.robots_denied += 1;
            return false;
        }

        if !self.scheduler.enqueue(request) {
            self.stats.duplicates_filtered += 1;
            return false;
        }
        true
    }

    /// Fetches one page and hands it to the walker
    ///
    /// Whatever the walker found before an extraction error is still
    /// scheduled or stored; the error is returned afterwards.
    async fn process_request(&mut self, request: CrawlRequest) -> Result<(), ScraperError> {
        let url = request.url;

        let (final_url, html) = match fetch_text(&self.client, &url).await {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            other => {
                return Err(ScraperError::PageFetch {
                    url: url.to_string(),
                    reason: other.failure_reason().unwrap_or_default(),
                })
            }
        };
        self.stats.pages_fetched += 1;

        let error = match request.kind {
            RequestKind::Index => {
                let mut parsed = {
                    let page = Page::parse(final_url, &html);
                    self.walker.parse_index(&page)
                };
                let error = parsed.error.take();
                self.handle_index(parsed);
                error
            }
            RequestKind::Chapter(context) => {
                let parsed = {
                    let page = Page::parse(final_url, &html);
                    self.walker.parse_chapter(&page, &context)
                };

                tracing::debug!("{} items on {}", parsed.items.len(), url);
                for item in parsed.items {
                    self.process_item(item).await?;
                }
                parsed.error
            }
        };

        match error {
            Some(source) => Err(ScraperError::Extract {
                url: url.to_string(),
                source,
            }),
            None => Ok(()),
        }
    }

    /// Downloads the item's files, finalizes it and stores it
    async fn process_item(&mut self, item: WorkItem) -> Result<(), ScraperError> {
        self.stats.items_scraped += 1;

        let mut results = Vec::with_capacity(item.file_urls.len());
        for file_url in &item.file_urls {
            results.push(self.download(file_url).await);
        }

        let item = self.completion.item_completed(&results, item);
        match &item.status {
            DownloadStatus::Downloaded(_) => self.stats.downloads_succeeded += 1,
            DownloadStatus::Failed { .. } => self.stats.downloads_failed += 1,
            DownloadStatus::Pending => {}
        }

        self.storage.insert_item(self.run_id, &item)?;
        Ok(())
    }

    /// Fetches one file, honoring robots.txt and the politeness delay
    ///
    /// File downloads are not subject to the offsite filter.
    async fn download(&mut self, file_url: &str) -> FileOutcome {
        if let Some(outcome) = self.files.cached(file_url) {
            return outcome;
        }

        if !self.robots.is_allowed(file_url, self.robots_agent()) {
            tracing::info!("File {} disallowed by robots.txt", file_url);
            self.stats.robots_denied += 1;
            return self.files.remember(
                file_url,
                Err(DownloadError::RobotsDenied {
                    url: file_url.to_string(),
                }),
            );
        }

        self.scheduler.throttle().await;
        self.files.fetch(&self.client, file_url).await
    }
}

/// Convenience function to run a complete crawl
///
/// # Example
///
/// ```no_run
/// use law_scraper::config::load_config_with_hash;
/// use law_scraper::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("statutes.toml"))?;
/// let stats = run_crawl(config, &hash).await?;
/// println!("{} items", stats.items_scraped);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<CrawlStats, ScraperError> {
    let mut coordinator = Coordinator::new(config, config_hash)?;
    coordinator.run().await
}
