//! Extraction errors raised while walking statute pages.

use thiserror::Error;

/// A page did not have the shape the walker expects
///
/// These errors abort the page they occur on; nothing is recovered per title
/// or per subchapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// Title label without a `<ROMAN> - ` prefix
    #[error("title label '{0}' has no roman numeral prefix")]
    TitleLabel(String),

    /// Subchapter label without a leading `.`
    #[error("subchapter label '{0}' does not start with '.'")]
    SubchapterLabel(String),

    /// An element that must be labeled has no text node
    #[error("{element} has no text")]
    MissingText { element: &'static str },

    /// A subchapter link without an href
    #[error("link '{label}' has no href")]
    MissingHref { label: String },

    /// A chapter link with zero or several hrefs, under the `fail` policy
    #[error("chapter link '{label}' has {count} href attributes")]
    AmbiguousHref { label: String, count: usize },

    /// An href that cannot be resolved against the page URL
    #[error("cannot resolve '{href}' against {base}: {source}")]
    Join {
        href: String,
        base: String,
        source: url::ParseError,
    },
}
