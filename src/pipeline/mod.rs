//! Item pipeline: file downloads and their completion
//!
//! The files pipeline fetches every URL in an item's `file_urls` and stores the
//! body under a checksum-addressed path. The completion handler then folds the
//! per-file outcomes into the item's final state.

mod completion;
mod error;
mod files;

pub use completion::{DownloadCompletionHandler, DOWNLOAD_TIME_FORMAT};
pub use error::DownloadError;
pub use files::{md5_hex, FileInfo, FileOutcome, FilesPipeline};
