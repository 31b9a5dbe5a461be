//! Counters collected over one crawl run

/// Totals reported at the end of [`Coordinator::run`](super::Coordinator::run)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: u64,
    pub page_errors: u64,
    pub extraction_errors: u64,
    pub chapter_requests: u64,
    pub chapters_skipped: u64,
    pub duplicates_filtered: u64,
    pub offsite_filtered: u64,
    pub robots_denied: u64,
    pub items_scraped: u64,
    pub downloads_succeeded: u64,
    pub downloads_failed: u64,
}

impl CrawlStats {
    pub fn log_summary(&self) {
        tracing::info!(
            pages_fetched = self.pages_fetched,
            page_errors = self.page_errors,
            extraction_errors = self.extraction_errors,
            chapter_requests = self.chapter_requests,
            chapters_skipped = self.chapters_skipped,
            "Page statistics"
        );
        tracing::info!(
            duplicates_filtered = self.duplicates_filtered,
            offsite_filtered = self.offsite_filtered,
            robots_denied = self.robots_denied,
            "Filter statistics"
        );
        tracing::info!(
            items_scraped = self.items_scraped,
            downloads_succeeded = self.downloads_succeeded,
            downloads_failed = self.downloads_failed,
            "Item statistics"
        );
    }
}
