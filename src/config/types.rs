use serde::Deserialize;

/// Main configuration structure for Law-Scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub files: FilesConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// The statutes index page the walk starts from
    #[serde(rename = "start-url", default = "default_start_url")]
    pub start_url: String,

    /// Hosts page requests may go to; empty allows any host
    #[serde(rename = "allowed-domains", default)]
    pub allowed_domains: Vec<String>,

    /// Minimum time between two network requests (milliseconds)
    #[serde(rename = "download-delay", default = "default_download_delay")]
    pub download_delay: u64,

    /// Whether robots.txt of the start URL's origin is honored
    #[serde(rename = "obey-robots", default = "default_obey_robots")]
    pub obey_robots: bool,

    /// What to do with chapter links that do not carry exactly one href
    #[serde(rename = "missing-href", default)]
    pub missing_href: HrefPolicy,
}

/// Policy for chapter entries whose href count is not exactly one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HrefPolicy {
    /// Record the entry as skipped and keep walking
    #[default]
    Skip,

    /// Abort the index page with an extraction error
    Fail,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Downloaded file storage
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Root directory the checksum-addressed file paths are relative to
    pub store: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding finalized items
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_start_url() -> String {
    "http://www.lrc.ky.gov/statutes/".to_string()
}

fn default_download_delay() -> u64 {
    250
}

fn default_obey_robots() -> bool {
    true
}
