//! Files pipeline: fetches item files and stores them by checksum-addressed path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use md5::Md5;
use reqwest::Client;
use sha2::{Digest, Sha256};
use url::Url;

use super::DownloadError;
use crate::crawler::{fetch_url, FetchResult};

/// A stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// The URL the file was fetched from
    pub url: String,

    /// Storage path relative to the files store root, e.g. `full/3b1f...e2.pdf`
    pub path: String,

    /// MD5 checksum of the file body, hex encoded
    pub checksum: String,
}

/// Outcome of fetching one entry of an item's `file_urls`
pub type FileOutcome = Result<FileInfo, DownloadError>;

/// Fetches and stores files under a store root
///
/// Outcomes are remembered per URL for the lifetime of the pipeline, so a URL
/// shared by several items is only fetched once per run.
pub struct FilesPipeline {
    store: PathBuf,
    cache: HashMap<String, FileOutcome>,
}

impl FilesPipeline {
    /// Creates a pipeline storing files under `store`
    pub fn new(store: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            cache: HashMap::new(),
        }
    }

    /// The files store root
    pub fn store(&self) -> &Path {
        &self.store
    }

    /// A previously computed outcome for this URL, if any
    pub fn cached(&self, url: &str) -> Option<FileOutcome> {
        self.cache.get(url).cloned()
    }

    /// Records an outcome computed outside the pipeline (e.g. a robots.txt denial)
    pub fn remember(&mut self, url: &str, outcome: FileOutcome) -> FileOutcome {
        self.cache.insert(url.to_string(), outcome.clone());
        outcome
    }

    /// Fetches `url` and stores its body
    ///
    /// Callers are expected to apply their politeness delay before calling.
    pub async fn fetch(&mut self, client: &Client, url: &str) -> FileOutcome {
        if let Some(outcome) = self.cached(url) {
            return outcome;
        }

        let outcome = match Url::parse(url) {
            Ok(parsed) => self.download(client, &parsed).await,
            Err(_) => Err(DownloadError::InvalidUrl {
                url: url.to_string(),
            }),
        };

        match &outcome {
            Ok(info) => tracing::debug!("Stored {} as {}", url, info.path),
            Err(e) => tracing::warn!("File download failed: {}", e),
        }

        self.remember(url, outcome)
    }

    async fn download(&self, client: &Client, url: &Url) -> FileOutcome {
        match fetch_url(client, url).await {
            FetchResult::Success {
                content_type, body, ..
            } => self.persist(url, &content_type, &body).await,
            FetchResult::HttpError { status_code } => Err(DownloadError::Http {
                url: url.to_string(),
                status: status_code,
            }),
            FetchResult::NetworkError { error } => Err(DownloadError::Network {
                url: url.to_string(),
                message: error,
            }),
        }
    }

    /// Writes a file body into the store and returns its info
    pub async fn persist(&self, url: &Url, content_type: &str, body: &[u8]) -> FileOutcome {
        let path = file_path(url, content_type);
        let absolute = self.store.join(&path);
        let store_error = |e: std::io::Error| DownloadError::Store {
            path: absolute.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(store_error)?;
        }
        tokio::fs::write(&absolute, body).await.map_err(store_error)?;

        Ok(FileInfo {
            url: url.to_string(),
            path,
            checksum: md5_hex(body),
        })
    }
}

/// Checksum-addressed storage path for a URL: `full/<sha256(url)><ext>`
///
/// The extension is `.pdf` for PDF responses, otherwise the extension of the
/// last URL path segment (if any).
pub fn file_path(url: &Url, content_type: &str) -> String {
    let digest = hex::encode(Sha256::digest(url.as_str().as_bytes()));
    let extension = if content_type.starts_with("application/pdf") {
        Some(".pdf".to_string())
    } else {
        extension_from_url(url)
    };
    format!("full/{}{}", digest, extension.unwrap_or_default())
}

fn extension_from_url(url: &Url) -> Option<String> {
    let last_segment = url.path_segments()?.next_back()?;
    let dot_index = last_segment.rfind('.')?;
    let extension = &last_segment[dot_index..];
    if extension.len() <= 1 || extension.len() > 6 {
        return None;
    }
    Some(extension.to_lowercase())
}

/// MD5 checksum of a body, hex encoded
///
/// # Examples
///
/// ```
/// use law_scraper::pipeline::md5_hex;
///
/// assert_eq!(md5_hex(b"hello"), "5d41402abc4b2a76b9719d911017c592");
/// ```
pub fn md5_hex(body: &[u8]) -> String {
    hex::encode(Md5::digest(body))
}
