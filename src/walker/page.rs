//! Fetched page abstraction: response URL plus parsed document.

use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::ExtractError;

/// A fetched HTML page
///
/// The URL is the final response URL (after redirects) and is the base every
/// relative link on the page is resolved against.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parses an HTML body fetched from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use law_scraper::Page;
    /// use url::Url;
    ///
    /// let url = Url::parse("http://www.lrc.ky.gov/statutes/").unwrap();
    /// let page = Page::parse(url, r#"<a href="chapter.aspx?id=1">1</a>"#);
    /// let chapter = page.urljoin("chapter.aspx?id=1").unwrap();
    /// assert_eq!(chapter.as_str(), "http://www.lrc.ky.gov/statutes/chapter.aspx?id=1");
    /// ```
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// The URL this page was served from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Runs a tree query over the whole document
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.document.select(selector)
    }

    /// Resolves an href against the page URL
    pub fn urljoin(&self, href: &str) -> Result<Url, ExtractError> {
        self.url.join(href.trim()).map_err(|source| ExtractError::Join {
            href: href.to_string(),
            base: self.url.to_string(),
            source,
        })
    }
}

/// Returns the first text node directly under an element
///
/// Text of nested elements is not considered: `<a><b>x</b></a>` has none.
pub fn first_text(element: ElementRef<'_>) -> Option<String> {
    element.children().find_map(|child| {
        child.value().as_text().map(|text| {
            let text: &str = text;
            text.to_owned()
        })
    })
}
