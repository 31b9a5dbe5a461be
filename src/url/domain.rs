use url::Url;

/// Extracts the lowercase host of a URL
///
/// Returns `None` for URLs without a host (`data:`, `mailto:` and the like).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use law_scraper::url::extract_domain;
///
/// let url = Url::parse("http://WWW.LRC.KY.GOV/statutes/").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.lrc.ky.gov".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
