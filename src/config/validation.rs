use crate::config::types::{Config, CrawlerConfig, FilesConfig, OutputConfig, UserAgentConfig};
use crate::url::{extract_domain, matches_wildcard};
use crate::ConfigError;
use url::Url;

/// Upper bound for the politeness delay (milliseconds)
const MAX_DOWNLOAD_DELAY: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_files_config(&config.files)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let start_url = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start_url '{}': {}", config.start_url, e))
    })?;

    if start_url.scheme() != "http" && start_url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    let host = extract_domain(&start_url).ok_or_else(|| {
        ConfigError::InvalidUrl(format!("start_url '{}' has no host", config.start_url))
    })?;

    for pattern in &config.allowed_domains {
        validate_domain_pattern(pattern)?;
    }

    if !config.allowed_domains.is_empty()
        && !config
            .allowed_domains
            .iter()
            .any(|pattern| matches_wildcard(pattern, &host))
    {
        return Err(ConfigError::Validation(format!(
            "start_url host '{}' is not covered by allowed_domains",
            host
        )));
    }

    if config.download_delay > MAX_DOWNLOAD_DELAY {
        return Err(ConfigError::Validation(format!(
            "download_delay must be <= {}ms, got {}ms",
            MAX_DOWNLOAD_DELAY, config.download_delay
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_files_config(config: &FilesConfig) -> Result<(), ConfigError> {
    if config.store.trim().is_empty() {
        return Err(ConfigError::Validation(
            "files store cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a domain pattern (supports a leading `*.` wildcard)
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain pattern cannot be empty".to_string(),
        ));
    }

    let domain = pattern.strip_prefix("*.").unwrap_or(pattern);

    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' has no base domain",
            pattern
        )));
    }

    if !domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains("..")
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' has a misplaced '.' or '-'",
            domain
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'lrc.ky.gov')",
            domain
        )));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
