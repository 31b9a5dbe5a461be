//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the crawler's user agent string
//! - GET requests for statute pages (decoded by their declared charset) and
//!   PDF files (kept as raw bytes)
//! - Classifying failures

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client, Response};
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
///
/// `B` is the body type: raw bytes for files, `String` for pages.
#[derive(Debug)]
pub enum FetchResult<B = Vec<u8>> {
    /// Successfully fetched the resource
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value (empty when absent)
        content_type: String,
        /// Response body
        body: B,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, broken body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl<B> FetchResult<B> {
    /// Short description of a failed fetch, `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use law_scraper::config::UserAgentConfig;
/// use law_scraper::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "LawScraper".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a GET request, turning transport failures and non-2xx statuses into
/// the matching [`FetchResult`]
///
/// No retries happen here; a failed fetch is reported once.
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(response)` |
/// | other status | `HttpError` |
/// | timeout | `NetworkError("Request timeout")` |
/// | connection failure | `NetworkError("Connection refused")` |
async fn send<B>(client: &Client, url: &Url) -> Result<Response, FetchResult<B>> {
    let response = client.get(url.clone()).send().await.map_err(|e| {
        let error = if e.is_timeout() {
            "Request timeout".to_string()
        } else if e.is_connect() {
            "Connection refused".to_string()
        } else {
            e.to_string()
        };
        FetchResult::NetworkError { error }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchResult::HttpError {
            status_code: status.as_u16(),
        });
    }
    Ok(response)
}

/// Final URL, status code and Content-Type (empty when absent)
fn response_meta(response: &Response) -> (Url, u16, String) {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    (
        response.url().clone(),
        response.status().as_u16(),
        content_type,
    )
}

/// Fetches a URL and keeps the body as raw bytes
///
/// Used for PDF downloads. A body read failure is a `NetworkError`.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match send(client, url).await {
        Ok(response) => response,
        Err(failure) => return failure,
    };
    let (final_url, status_code, content_type) = response_meta(&response);

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code,
            content_type,
            body: body.to_vec(),
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Fetches a page and decodes its body as text
///
/// The body is decoded with the charset named in the Content-Type header,
/// falling back to UTF-8.
pub async fn fetch_text(client: &Client, url: &Url) -> FetchResult<String> {
    let response = match send(client, url).await {
        Ok(response) => response,
        Err(failure) => return failure,
    };
    let (final_url, status_code, content_type) = response_meta(&response);

    match response.text().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code,
            content_type,
            body,
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}
