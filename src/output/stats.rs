//! Statistics generation from the item database
//!
//! This module provides functionality for extracting and displaying
//! statistics about the latest crawl run from the storage layer.

use crate::storage::{ItemCounts, ItemStore, RunRecord, StorageResult};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Statistics for one crawl run
#[derive(Debug, Clone)]
pub struct ItemStatistics {
    /// The run the counts belong to
    pub run: RunRecord,

    /// Wall-clock duration of the run, when it has finished
    pub duration_seconds: Option<u64>,

    /// Item totals per status plus distinct titles and chapters
    pub counts: ItemCounts,
}

impl ItemStatistics {
    /// Share of items whose PDF was stored, in percent
    pub fn success_rate(&self) -> f64 {
        if self.counts.total == 0 {
            return 0.0;
        }
        (self.counts.downloaded as f64 / self.counts.total as f64) * 100.0
    }
}

/// Loads statistics for the most recent run
///
/// Returns `Ok(None)` when the database holds no runs yet.
pub fn load_statistics(storage: &dyn ItemStore) -> StorageResult<Option<ItemStatistics>> {
    let Some(run) = storage.get_latest_run()? else {
        return Ok(None);
    };

    let counts = storage.count_items(run.id)?;
    let duration_seconds = run_duration(&run);

    Ok(Some(ItemStatistics {
        run,
        duration_seconds,
        counts,
    }))
}

fn run_duration(run: &RunRecord) -> Option<u64> {
    let started = run.started_at.parse::<DateTime<Utc>>().ok()?;
    let finished = run.finished_at.as_deref()?.parse::<DateTime<Utc>>().ok()?;
    u64::try_from((finished - started).num_seconds()).ok()
}

/// Renders statistics as the text printed by [`print_statistics`]
pub fn format_statistics(stats: &ItemStatistics) -> String {
    let mut out = String::new();
    let counts = &stats.counts;

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Run {} ({})", stats.run.id, stats.run.status.to_db_string());
    let _ = writeln!(out, "  Started: {}", stats.run.started_at);
    if let Some(finished) = &stats.run.finished_at {
        let _ = writeln!(out, "  Finished: {}", finished);
    }
    if let Some(seconds) = stats.duration_seconds {
        let _ = writeln!(out, "  Duration: {}s", seconds);
    }
    let _ = writeln!(out, "  Config hash: {}", stats.run.config_hash);
    let _ = writeln!(out);

    let _ = writeln!(out, "Items:");
    let _ = writeln!(out, "  Titles: {}", counts.titles);
    let _ = writeln!(out, "  Chapters: {}", counts.chapters);
    let _ = writeln!(out, "  Subchapters: {}", counts.total);
    let _ = writeln!(out, "  Downloaded: {}", counts.downloaded);
    let _ = writeln!(out, "  Failed: {}", counts.failed);
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} PDFs stored)",
        stats.success_rate(),
        counts.downloaded,
        counts.total
    );

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ItemStatistics) {
    print!("{}", format_statistics(stats));
}
