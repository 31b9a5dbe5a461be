/// Checks if a domain matches an allowed-domain pattern
///
/// `"lrc.ky.gov"` matches only that host; `"*.ky.gov"` matches `ky.gov` and any
/// host below it.
///
/// # Examples
///
/// ```
/// use law_scraper::url::matches_wildcard;
///
/// assert!(matches_wildcard("www.lrc.ky.gov", "www.lrc.ky.gov"));
/// assert!(matches_wildcard("*.ky.gov", "www.lrc.ky.gov"));
/// assert!(!matches_wildcard("*.ky.gov", "ky.gov.example.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}
