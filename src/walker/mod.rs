//! Site walker for the statutes hierarchy
//!
//! The statutes site is three levels deep:
//! - the index page lists titles, each followed by a list of chapter links
//! - every chapter page lists links to its subchapters
//! - every subchapter link points at a PDF
//!
//! [`SiteWalker::parse_index`] turns the index page into chapter requests that
//! carry the title and chapter they belong to; [`SiteWalker::parse_chapter`]
//! turns a chapter page into [`WorkItem`]s. Both are pure functions of the page
//! and the inherited context.

mod error;
mod labels;
mod page;

pub use error::ExtractError;
pub use labels::{roman_to_int, subchapter_index, title_index};
pub use page::{first_text, Page};

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};
use url::Url;

use crate::config::{CrawlerConfig, HrefPolicy};
use crate::item::{HierarchyContext, WorkItem};

/// `//div[@id='Panel1']/span/ul/li/span`
#[allow(clippy::expect_used)]
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div#Panel1 > span > ul > li > span").expect("title selector is valid")
});

/// `//ul/li//a`
#[allow(clippy::expect_used)]
static SUBCHAPTER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul > li a").expect("subchapter selector is valid"));

#[allow(clippy::expect_used)]
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("link selector is valid"));

/// A request for a chapter page, carrying the hierarchy it was found under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChapterRequest {
    pub url: Url,
    pub context: HierarchyContext,
}

/// A chapter link that was skipped because it did not carry exactly one href
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChapter {
    pub title_name: String,
    pub chapter_name: String,
    pub href_count: usize,
}

/// Everything discovered on the index page
///
/// When the page is malformed, `requests` and `skipped` hold what was found
/// before the failure and `error` holds the failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexParse {
    /// Number of titles found
    pub titles: usize,

    /// One request per usable chapter link, in document order
    pub requests: Vec<ChapterRequest>,

    /// Chapter links dropped under [`HrefPolicy::Skip`]
    pub skipped: Vec<SkippedChapter>,

    /// The extraction error that stopped the walk, if any
    pub error: Option<ExtractError>,
}

/// Items discovered on a chapter page, plus the error that stopped the walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterParse {
    /// One pending item per subchapter link before any failure, in document order
    pub items: Vec<WorkItem>,

    pub error: Option<ExtractError>,
}

/// Walks the titles → chapters → subchapters hierarchy
#[derive(Debug, Clone)]
pub struct SiteWalker {
    start_url: Url,
    href_policy: HrefPolicy,
}

impl SiteWalker {
    /// Creates a walker starting at the statutes index page
    pub fn new(start_url: Url, href_policy: HrefPolicy) -> Self {
        Self {
            start_url,
            href_policy,
        }
    }

    /// Creates a walker from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(&config.start_url)?, config.missing_href))
    }

    /// The index page URL
    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Parses the statutes index page into chapter requests
    ///
    /// Every title's Roman-numeral index is computed as soon as the title is
    /// found, before any of its chapters are looked at, so a malformed title
    /// label stops the walk even when the title has no chapters. Requests
    /// found for earlier titles are kept.
    ///
    /// Chapter links are all `<a>` elements inside the first `<ul>` that
    /// follows the title's `<li>`. Nested subtitle lists are inside that `<ul>`,
    /// so subtitle links are picked up too.
    pub fn parse_index(&self, page: &Page) -> IndexParse {
        let mut parsed = IndexParse::default();
        if let Err(e) = self.walk_index(page, &mut parsed) {
            parsed.error = Some(e);
        }

        tracing::debug!(
            "Index {}: {} titles, {} chapter requests, {} skipped",
            page.url(),
            parsed.titles,
            parsed.requests.len(),
            parsed.skipped.len()
        );

        parsed
    }

    fn walk_index(&self, page: &Page, parsed: &mut IndexParse) -> Result<(), ExtractError> {
        for title in page.select(&TITLE_SELECTOR) {
            let title_name =
                first_text(title).ok_or(ExtractError::MissingText { element: "title" })?;
            let title_index = title_index(&title_name)?;
            parsed.titles += 1;

            for chapter in chapter_links(title) {
                let chapter_name = first_text(chapter).ok_or(ExtractError::MissingText {
                    element: "chapter link",
                })?;

                let hrefs: Vec<&str> = chapter
                    .value()
                    .attrs()
                    .filter(|(name, _)| *name == "href")
                    .map(|(_, value)| value)
                    .collect();

                let [href] = hrefs.as_slice() else {
                    match self.href_policy {
                        HrefPolicy::Skip => {
                            tracing::warn!(
                                "Skipping chapter '{}' of '{}': {} href attributes",
                                chapter_name,
                                title_name,
                                hrefs.len()
                            );
                            parsed.skipped.push(SkippedChapter {
                                title_name: title_name.clone(),
                                chapter_name,
                                href_count: hrefs.len(),
                            });
                            continue;
                        }
                        HrefPolicy::Fail => {
                            return Err(ExtractError::AmbiguousHref {
                                label: chapter_name,
                                count: hrefs.len(),
                            });
                        }
                    }
                };

                let url = page.urljoin(href)?;
                parsed.requests.push(ChapterRequest {
                    url,
                    context: HierarchyContext {
                        title_name: title_name.clone(),
                        title_index,
                        chapter_name,
                    },
                });
            }
        }

        Ok(())
    }

    /// Parses a chapter page into one pending item per subchapter link
    ///
    /// The first link whose label has no leading `.` (or that has no href)
    /// stops the walk; items for the links before it are kept.
    pub fn parse_chapter(&self, page: &Page, context: &HierarchyContext) -> ChapterParse {
        let mut parsed = ChapterParse::default();
        if let Err(e) = walk_chapter(page, context, &mut parsed.items) {
            parsed.error = Some(e);
        }

        tracing::debug!(
            "Chapter '{}' ({}): {} subchapters",
            context.chapter_name,
            page.url(),
            parsed.items.len()
        );

        parsed
    }
}

fn walk_chapter(
    page: &Page,
    context: &HierarchyContext,
    items: &mut Vec<WorkItem>,
) -> Result<(), ExtractError> {
    for link in page.select(&SUBCHAPTER_SELECTOR) {
        let subchapter_name = first_text(link).ok_or(ExtractError::MissingText {
            element: "subchapter link",
        })?;
        let subchapter_index = subchapter_index(&subchapter_name)?;
        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| ExtractError::MissingHref {
                label: subchapter_name.clone(),
            })?;
        let subchapter_link = page.urljoin(href)?;

        items.push(WorkItem::new(
            context,
            subchapter_name,
            subchapter_index,
            subchapter_link.to_string(),
        ));
    }
    Ok(())
}

/// Links in the first `<ul>` sibling following the title's parent `<li>`
fn chapter_links(title: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let Some(entry) = title.parent().and_then(ElementRef::wrap) else {
        return Vec::new();
    };

    entry
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "ul")
        .map(|list| list.select(&LINK_SELECTOR).collect())
        .unwrap_or_default()
}
