//! Database Connection and Setup

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

use tasklist_core::StoreError;

#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

impl From<LocalStoreError> for StoreError {
    fn from(e: LocalStoreError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

/// Open (or create) the database file and ensure the table exists
pub fn open(path: &Path) -> Result<Connection, LocalStoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    log::info!("Opened local task store at {}", path.display());
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection, LocalStoreError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), LocalStoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            text TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            due_date TEXT,
            priority TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at)",
        (),
    )?;
    Ok(())
}
