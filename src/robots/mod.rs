//! Robots.txt handling module
//!
//! robots.txt is fetched once per run from the start URL's origin. A missing
//! or unreachable robots.txt allows everything.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::{fetch_text, FetchResult};
use reqwest::Client;
use url::Url;

/// Fetches and parses `/robots.txt` for the origin of `url`
pub async fn fetch_robots(client: &Client, url: &Url) -> ParsedRobots {
    let robots_url = match url.join("/robots.txt") {
        Ok(robots_url) => robots_url,
        Err(e) => {
            tracing::debug!("No robots.txt location for {}: {}", url, e);
            return ParsedRobots::allow_all();
        }
    };

    match fetch_text(client, &robots_url).await {
        FetchResult::Success { body, .. } => {
            tracing::debug!("Fetched {}", robots_url);
            ParsedRobots::from_content(&body)
        }
        other => {
            tracing::info!(
                "robots.txt unavailable at {} ({}), allowing all",
                robots_url,
                other.failure_reason().unwrap_or_default()
            );
            ParsedRobots::allow_all()
        }
    }
}
