//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ItemStore trait.

use crate::item::{DownloadStatus, PdfRecord, WorkItem};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ItemStore, StorageError, StorageResult};
use crate::storage::{ItemCounts, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

/// An `items` row before its status columns are folded back into a
/// [`DownloadStatus`]
struct ItemRow {
    id: i64,
    item: WorkItem,
    status: String,
    failure: Option<String>,
    pdf_path: Option<String>,
    pdf_md5: Option<String>,
    download_time: Option<String>,
}

impl ItemRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            item: WorkItem {
                title_name: row.get(1)?,
                title_index: row.get(2)?,
                chapter_name: row.get(3)?,
                subchapter_name: row.get(4)?,
                subchapter_index: row.get(5)?,
                file_urls: vec![row.get(6)?],
                subchapter_link: row.get(6)?,
                status: DownloadStatus::Pending,
            },
            status: row.get(7)?,
            failure: row.get(8)?,
            pdf_path: row.get(9)?,
            pdf_md5: row.get(10)?,
            download_time: row.get(11)?,
        })
    }

    fn into_item(self) -> StorageResult<WorkItem> {
        let corrupt = |message: &str| StorageError::Corrupt {
            id: self.id,
            message: message.to_string(),
        };

        let status = match self.status.as_str() {
            "downloaded" => match (&self.pdf_path, &self.pdf_md5, &self.download_time) {
                (Some(pdf_path), Some(pdf_md5), Some(download_time)) => {
                    DownloadStatus::Downloaded(PdfRecord {
                        pdf_path: pdf_path.clone(),
                        pdf_md5: pdf_md5.clone(),
                        download_time: download_time.clone(),
                    })
                }
                _ => return Err(corrupt("downloaded item without pdf fields")),
            },
            "failed" => match &self.failure {
                Some(failure) => DownloadStatus::Failed {
                    failure: failure.clone(),
                },
                None => return Err(corrupt("failed item without failure marker")),
            },
            other => return Err(corrupt(&format!("unexpected status '{}'", other))),
        };

        Ok(WorkItem { status, ..self.item })
    }
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Missing parent directories of `path` are created.
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn map_run(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
        Ok(RunRecord {
            id: row.get(0)?,
            started_at: row.get(1)?,
            finished_at: row.get(2)?,
            config_hash: row.get(3)?,
            status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                .unwrap_or(RunStatus::Running),
        })
    }
}

impl ItemStore for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                Self::map_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                Self::map_run,
            )
            .optional()?;
        Ok(run)
    }

    // ===== Items =====

    fn insert_item(&mut self, run_id: i64, item: &WorkItem) -> StorageResult<i64> {
        if !item.status.is_terminal() {
            return Err(StorageError::PendingItem(item.subchapter_link.clone()));
        }

        let pdf = item.pdf();
        self.conn.execute(
            "INSERT INTO items (run_id, title_name, title_index, chapter_name, subchapter_name,
                subchapter_index, subchapter_link, hierarchy_path, status, failure,
                pdf_path, pdf_md5, download_time, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                run_id,
                item.title_name,
                item.title_index,
                item.chapter_name,
                item.subchapter_name,
                item.subchapter_index,
                item.subchapter_link,
                item.savepath(),
                item.status.to_db_string(),
                item.failure(),
                pdf.map(|p| p.pdf_path.as_str()),
                pdf.map(|p| p.pdf_md5.as_str()),
                pdf.map(|p| p.download_time.as_str()),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn load_items(&self, run_id: i64) -> StorageResult<Vec<WorkItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title_name, title_index, chapter_name, subchapter_name, subchapter_index,
                    subchapter_link, status, failure, pdf_path, pdf_md5, download_time
             FROM items WHERE run_id = ?1 ORDER BY id",
        )?;

        let rows = stmt
            .query_map(params![run_id], ItemRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    fn count_items(&self, run_id: i64) -> StorageResult<ItemCounts> {
        let counts = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(status = 'downloaded'), 0),
                    COALESCE(SUM(status = 'failed'), 0),
                    COUNT(DISTINCT title_name),
                    COUNT(DISTINCT hierarchy_path)
             FROM items WHERE run_id = ?1",
            params![run_id],
            |row| {
                Ok(ItemCounts {
                    total: row.get::<_, i64>(0)? as u64,
                    downloaded: row.get::<_, i64>(1)? as u64,
                    failed: row.get::<_, i64>(2)? as u64,
                    titles: row.get::<_, i64>(3)? as u64,
                    chapters: row.get::<_, i64>(4)? as u64,
                })
            },
        )?;
        Ok(counts)
    }
}
