use url::Url;

/// Returns the canonical form of a URL used for duplicate filtering
///
/// The fragment is dropped, query pairs are sorted by key then value, and an
/// empty query is removed. Two requests with the same canonical form are
/// considered the same request.
///
/// # Examples
///
/// ```
/// use law_scraper::url::canonicalize_url;
/// use url::Url;
///
/// let a = Url::parse("http://www.lrc.ky.gov/chapter.aspx?id=2&b=1#top").unwrap();
/// let b = Url::parse("http://www.lrc.ky.gov/chapter.aspx?b=1&id=2").unwrap();
/// assert_eq!(canonicalize_url(&a), canonicalize_url(&b));
/// ```
pub fn canonicalize_url(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_fragment(None);

    let mut pairs: Vec<(String, String)> = canonical
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if pairs.is_empty() {
        canonical.set_query(None);
    } else {
        pairs.sort();
        canonical.query_pairs_mut().clear().extend_pairs(pairs);
    }

    canonical.to_string()
}
