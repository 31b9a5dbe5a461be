//! Law-Scraper: a statutes crawler
//!
//! This crate walks the Kentucky Revised Statutes site (titles, then chapters,
//! then subchapters) and downloads the PDF behind every subchapter, recording
//! where it was stored, its MD5 checksum and when it was fetched.

pub mod config;
pub mod crawler;
pub mod item;
pub mod output;
pub mod pipeline;
pub mod robots;
pub mod storage;
pub mod url;
pub mod walker;

use thiserror::Error;

/// Main error type for Law-Scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Failed to fetch {url}: {reason}")]
    PageFetch { url: String, reason: String },

    #[error("Extraction failed on {url}: {source}")]
    Extract {
        url: String,
        source: walker::ExtractError,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

// Re-export commonly used types
pub use config::Config;
pub use item::{DownloadStatus, HierarchyContext, PdfRecord, WorkItem};
pub use pipeline::{DownloadCompletionHandler, FileInfo, FileOutcome};
pub use walker::{Page, SiteWalker};
