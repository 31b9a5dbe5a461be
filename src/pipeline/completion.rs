//! Download completion: folds file outcomes into the item's final state.

use std::path::PathBuf;

use chrono::{DateTime, Local};

use super::FileOutcome;
use crate::config::FilesConfig;
use crate::item::{DownloadStatus, PdfRecord, WorkItem, PDF_DOWNLOAD_FAILURE};

/// Format of `download_time`: `YYYY-MM-DD HH:MM:SS`
pub const DOWNLOAD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Finalizes items once their file has been fetched (or not)
///
/// The files store root is injected at construction and joined with the
/// relative path reported by the files pipeline.
#[derive(Debug, Clone)]
pub struct DownloadCompletionHandler {
    files_store: PathBuf,
}

impl DownloadCompletionHandler {
    pub fn new(files_store: impl Into<PathBuf>) -> Self {
        Self {
            files_store: files_store.into(),
        }
    }

    pub fn from_config(config: &FilesConfig) -> Self {
        Self::new(&config.store)
    }

    /// Finalizes an item, stamping it with the current local time
    pub fn item_completed(&self, results: &[FileOutcome], item: WorkItem) -> WorkItem {
        self.item_completed_at(results, item, Local::now())
    }

    /// Finalizes an item with an explicit completion time
    ///
    /// Only the first outcome is looked at: items carry exactly one file URL.
    /// A failed (or missing) outcome marks the item with
    /// `failure = "PDF Download"` and leaves every other field untouched.
    pub fn item_completed_at(
        &self,
        results: &[FileOutcome],
        mut item: WorkItem,
        now: DateTime<Local>,
    ) -> WorkItem {
        let Some(Ok(info)) = results.first() else {
            item.status = DownloadStatus::Failed {
                failure: PDF_DOWNLOAD_FAILURE.to_string(),
            };
            return item;
        };

        item.status = DownloadStatus::Downloaded(PdfRecord {
            pdf_path: self.files_store.join(&info.path).display().to_string(),
            pdf_md5: info.checksum.clone(),
            download_time: now.format(DOWNLOAD_TIME_FORMAT).to_string(),
        });
        item
    }
}
