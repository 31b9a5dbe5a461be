use thiserror::Error;

/// Why a file could not be fetched or stored
///
/// Download errors never abort a crawl: they are turned into a failure
/// marker on the item by the completion handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("failed to store {path}: {message}")]
    Store { path: String, message: String },

    #[error("{url} disallowed by robots.txt")]
    RobotsDenied { url: String },

    #[error("invalid file URL '{url}'")]
    InvalidUrl { url: String },
}
