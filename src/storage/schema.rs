//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Law-Scraper item store.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Finalized subchapter items
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    title_name TEXT NOT NULL,
    title_index INTEGER NOT NULL,
    chapter_name TEXT NOT NULL,
    subchapter_name TEXT NOT NULL,
    subchapter_index TEXT NOT NULL,
    subchapter_link TEXT NOT NULL,
    hierarchy_path TEXT NOT NULL,
    status TEXT NOT NULL,
    failure TEXT,
    pdf_path TEXT,
    pdf_md5 TEXT,
    download_time TEXT,
    scraped_at TEXT NOT NULL,
    CHECK (failure IS NULL OR pdf_path IS NULL)
);

CREATE INDEX IF NOT EXISTS idx_items_run ON items(run_id);
CREATE INDEX IF NOT EXISTS idx_items_status ON items(status);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["runs", "items"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table {} should exist", table);
        }
    }

    #[test]
    fn test_failure_and_path_are_exclusive() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES ('now', 'hash', 'running')",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO items (run_id, title_name, title_index, chapter_name, subchapter_name,
             subchapter_index, subchapter_link, hierarchy_path, status, failure, pdf_path, scraped_at)
             VALUES (1, 't', 1, 'c', 's', '010', 'http://x', 't/c', 'failed', 'PDF Download', '/data/a.pdf', 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
