//! Scraped item definitions
//!
//! A [`WorkItem`] is materialized once per subchapter and always carries the
//! title and chapter it was found under. Its [`DownloadStatus`] moves from
//! `Pending` to exactly one terminal state.

use std::fmt;

/// Failure marker recorded on items whose PDF could not be fetched
pub const PDF_DOWNLOAD_FAILURE: &str = "PDF Download";

/// Hierarchy metadata inherited from the index page by every chapter request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HierarchyContext {
    /// Display name of the title, e.g. `"I - GENERAL PROVISIONS"`
    pub title_name: String,

    /// Value of the title's Roman numeral
    pub title_index: u32,

    /// Display name of the chapter link
    pub chapter_name: String,
}

impl HierarchyContext {
    /// Relative directory for this chapter: `title_name/chapter_name` with
    /// spaces replaced by underscores
    ///
    /// # Examples
    ///
    /// ```
    /// use law_scraper::HierarchyContext;
    ///
    /// let context = HierarchyContext {
    ///     title_name: "I - General Provisions".to_string(),
    ///     title_index: 1,
    ///     chapter_name: "1 Definitions".to_string(),
    /// };
    /// assert_eq!(context.savepath(), "I_-_General_Provisions/1_Definitions");
    /// ```
    pub fn savepath(&self) -> String {
        format!(
            "{}/{}",
            self.title_name.replace(' ', "_"),
            self.chapter_name.replace(' ', "_")
        )
    }
}

/// Provenance of a successfully downloaded PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRecord {
    /// Absolute storage path (store root joined with the checksum-addressed path)
    pub pdf_path: String,

    /// MD5 checksum of the file body, hex encoded
    pub pdf_md5: String,

    /// Local wall-clock time of completion, `YYYY-MM-DD HH:MM:SS`
    pub download_time: String,
}

/// Where an item is in its download lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    /// The file has not been fetched yet
    #[default]
    Pending,

    /// The file was fetched and stored
    Downloaded(PdfRecord),

    /// The file could not be fetched
    Failed { failure: String },
}

impl DownloadStatus {
    /// Returns true once the item reached a terminal state
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Database representation of the status
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Downloaded(_) => "downloaded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Downloaded(record) => write!(f, "downloaded to {}", record.pdf_path),
            Self::Failed { failure } => write!(f, "failed ({})", failure),
        }
    }
}

/// The per-subchapter record emitted by the walker and finalized by the
/// download completion handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub title_name: String,
    pub title_index: u32,
    pub chapter_name: String,
    pub subchapter_name: String,

    /// Token following the leading `.` of the subchapter label, e.g. `"010"`
    pub subchapter_index: String,

    /// Absolute URL of the subchapter PDF
    pub subchapter_link: String,

    /// Files to fetch for this item; always `[subchapter_link]`
    pub file_urls: Vec<String>,

    pub status: DownloadStatus,
}

impl WorkItem {
    /// Creates a pending item under the given hierarchy
    pub fn new(
        context: &HierarchyContext,
        subchapter_name: String,
        subchapter_index: String,
        subchapter_link: String,
    ) -> Self {
        Self {
            title_name: context.title_name.clone(),
            title_index: context.title_index,
            chapter_name: context.chapter_name.clone(),
            subchapter_name,
            subchapter_index,
            file_urls: vec![subchapter_link.clone()],
            subchapter_link,
            status: DownloadStatus::Pending,
        }
    }

    /// The hierarchy this item was found under
    pub fn context(&self) -> HierarchyContext {
        HierarchyContext {
            title_name: self.title_name.clone(),
            title_index: self.title_index,
            chapter_name: self.chapter_name.clone(),
        }
    }

    /// See [`HierarchyContext::savepath`]
    pub fn savepath(&self) -> String {
        self.context().savepath()
    }

    /// The failure reason, if the download failed
    pub fn failure(&self) -> Option<&str> {
        match &self.status {
            DownloadStatus::Failed { failure } => Some(failure),
            _ => None,
        }
    }

    /// The download provenance, if the download succeeded
    pub fn pdf(&self) -> Option<&PdfRecord> {
        match &self.status {
            DownloadStatus::Downloaded(record) => Some(record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> HierarchyContext {
        HierarchyContext {
            title_name: "IV - REVENUE AND TAXATION".to_string(),
            title_index: 4,
            chapter_name: "131 Department of Revenue".to_string(),
        }
    }

    #[test]
    fn test_savepath_replaces_spaces_only() {
        let context = HierarchyContext {
            title_name: "I - General Provisions".to_string(),
            title_index: 1,
            chapter_name: "1 Definitions".to_string(),
        };
        assert_eq!(context.savepath(), "I_-_General_Provisions/1_Definitions");

        let context = HierarchyContext {
            title_name: "II - Legislative (Branch)".to_string(),
            title_index: 2,
            chapter_name: "6.5 Ethics, Code".to_string(),
        };
        assert_eq!(context.savepath(), "II_-_Legislative_(Branch)/6.5_Ethics,_Code");
    }

    #[test]
    fn test_new_item_inherits_context() {
        let item = WorkItem::new(
            &context(),
            ".010 Definitions".to_string(),
            "010".to_string(),
            "http://www.lrc.ky.gov/statutes/statute.aspx?id=1".to_string(),
        );

        assert_eq!(item.title_name, "IV - REVENUE AND TAXATION");
        assert_eq!(item.title_index, 4);
        assert_eq!(item.chapter_name, "131 Department of Revenue");
        assert_eq!(item.file_urls, vec![item.subchapter_link.clone()]);
        assert_eq!(item.status, DownloadStatus::Pending);
        assert_eq!(item.context(), context());
        assert_eq!(item.failure(), None);
        assert_eq!(item.pdf(), None);
    }

    #[test]
    fn test_status_terminal() {
        assert!(!DownloadStatus::Pending.is_terminal());
        assert!(DownloadStatus::Failed {
            failure: PDF_DOWNLOAD_FAILURE.to_string()
        }
        .is_terminal());
        assert!(DownloadStatus::Downloaded(PdfRecord {
            pdf_path: "/data/full/a.pdf".to_string(),
            pdf_md5: "abc".to_string(),
            download_time: "2024-01-01 00:00:00".to_string(),
        })
        .is_terminal());
    }

    #[test]
    fn test_status_display() {
        let failed = DownloadStatus::Failed {
            failure: PDF_DOWNLOAD_FAILURE.to_string(),
        };
        assert_eq!(failed.to_string(), "failed (PDF Download)");
        assert_eq!(DownloadStatus::Pending.to_db_string(), "pending");
        assert_eq!(failed.to_db_string(), "failed");
    }
}
