//! URL handling module for Law-Scraper
//!
//! This module provides domain extraction, wildcard matching for the offsite
//! filter, and the canonical form used to fingerprint requests.

mod canonical;
mod domain;
mod matcher;

pub use canonical::canonicalize_url;
pub use domain::extract_domain;
pub use matcher::matches_wildcard;

use url::Url;

/// Checks whether a URL may be requested under the given allowed domains
///
/// An empty list allows every host. URLs without a host are never allowed.
///
/// # Examples
///
/// ```
/// use law_scraper::url::is_allowed_domain;
/// use url::Url;
///
/// let allowed = vec!["www.lrc.ky.gov".to_string()];
/// let chapter = Url::parse("http://www.lrc.ky.gov/statutes/chapter.aspx?id=1").unwrap();
/// let offsite = Url::parse("http://example.com/").unwrap();
/// assert!(is_allowed_domain(&chapter, &allowed));
/// assert!(!is_allowed_domain(&offsite, &allowed));
/// ```
pub fn is_allowed_domain(url: &Url, allowed_domains: &[String]) -> bool {
    let Some(host) = extract_domain(url) else {
        return false;
    };

    allowed_domains.is_empty()
        || allowed_domains
            .iter()
            .any(|pattern| matches_wildcard(&pattern.to_lowercase(), &host))
}
