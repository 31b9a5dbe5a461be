//! Storage traits and error types
//!
//! This module defines the trait interface for item stores and the
//! associated error types.

use crate::item::WorkItem;
use crate::storage::{ItemCounts, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Item '{0}' has not been finalized")]
    PendingItem(String),

    #[error("Corrupt item row {id}: {message}")]
    Corrupt { id: i64, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Downstream sink for finalized items
///
/// Items reach the store exactly once, after the completion handler moved
/// them to a terminal state.
pub trait ItemStore {
    // ===== Run Management =====

    /// Creates a new crawl run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as finished with the given status
    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Items =====

    /// Persists a finalized item; pending items are rejected
    fn insert_item(&mut self, run_id: i64, item: &WorkItem) -> StorageResult<i64>;

    /// Loads every item of a run in insertion order
    fn load_items(&self, run_id: i64) -> StorageResult<Vec<WorkItem>>;

    /// Counts the items of a run
    fn count_items(&self, run_id: i64) -> StorageResult<ItemCounts>;
}
