//! Scheduler for managing the crawl frontier and politeness delay
//!
//! This module handles:
//! - FIFO queue of page requests
//! - Dropping requests whose canonical URL was already seen
//! - A minimum delay between consecutive requests

use crate::item::HierarchyContext;
use crate::url::canonicalize_url;
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};
use url::Url;

/// What a queued page is expected to contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// The statutes index page listing titles and chapters
    Index,

    /// A chapter page listing subchapter links
    Chapter(HierarchyContext),
}

/// A page queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub url: Url,
    pub kind: RequestKind,
}

impl CrawlRequest {
    pub fn index(url: Url) -> Self {
        Self {
            url,
            kind: RequestKind::Index,
        }
    }

    pub fn chapter(url: Url, context: HierarchyContext) -> Self {
        Self {
            url,
            kind: RequestKind::Chapter(context),
        }
    }
}

/// Scheduler owns the frontier and paces every outgoing request
///
/// Page requests and file downloads share one delay, so the site sees at most
/// one request per `delay`.
pub struct Scheduler {
    frontier: VecDeque<CrawlRequest>,
    seen: HashSet<String>,
    delay: Duration,
    last_request: Option<Instant>,
}

impl Scheduler {
    /// Creates a scheduler with the given minimum delay between requests
    pub fn new(delay: Duration) -> Self {
        Self {
            frontier: VecDeque::new(),
            seen: HashSet::new(),
            delay,
            last_request: None,
        }
    }

    /// The current minimum delay between requests
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Queues a request
    ///
    /// Returns `false` if a request for the same canonical URL was queued
    /// before; the request is dropped in that case.
    pub fn enqueue(&mut self, request: CrawlRequest) -> bool {
        if !self.seen.insert(canonicalize_url(&request.url)) {
            tracing::debug!("Dropping duplicate request for {}", request.url);
            return false;
        }
        self.frontier.push_back(request);
        true
    }

    /// Pops the next request, waiting out the politeness delay first
    pub async fn next_request(&mut self) -> Option<CrawlRequest> {
        let request = self.frontier.pop_front()?;
        self.throttle().await;
        Some(request)
    }

    /// Sleeps until `delay` has passed since the previous request, then
    /// records a new request as started
    pub async fn throttle(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// Gets the number of requests waiting in the frontier
    pub fn frontier_size(&self) -> usize {
        self.frontier.len()
    }
}
