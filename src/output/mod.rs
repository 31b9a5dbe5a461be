//! Output module for reporting stored crawl results
//!
//! Reads the item store back and renders per-run statistics for `--stats`.

pub mod stats;

pub use stats::{format_statistics, load_statistics, print_statistics, ItemStatistics};
