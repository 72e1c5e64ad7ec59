//! Task Repository - SQLite CRUD

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use tasklist_core::{NewTask, Priority, StoreError, StoreResult, Task, TaskPatch, TaskStore};

use crate::db::{self, LocalStoreError};

const SELECT_TASKS: &str =
    "SELECT id, text, completed, due_date, priority, created_at FROM tasks";

/// SQLite implementation of the task store
#[derive(Clone)]
pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    pub fn open(path: &Path) -> Result<Self, LocalStoreError> {
        Ok(Self::new(Arc::new(Mutex::new(db::open(path)?))))
    }

    pub fn open_in_memory() -> Result<Self, LocalStoreError> {
        Ok(Self::new(Arc::new(Mutex::new(db::open_in_memory()?))))
    }
}

fn row_to_task(row: &Row) -> Result<Task, LocalStoreError> {
    let id: String = row.get(0)?;
    let due_date: Option<String> = row.get(3)?;
    let priority: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;

    let corrupt = |reason: String| LocalStoreError::Corrupt {
        id: id.clone(),
        reason,
    };

    let due_date = due_date
        .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| corrupt(format!("due_date: {}", e)))?;
    let priority = match priority {
        Some(p) => Some(Priority::parse(&p).ok_or_else(|| corrupt(format!("priority: {}", p)))?),
        None => None,
    };
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| corrupt(format!("created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(Task {
        text: row.get(1)?,
        completed: row.get::<_, i64>(2)? != 0,
        due_date,
        priority,
        created_at: Some(created_at),
        id,
    })
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY created_at ASC, rowid ASC", SELECT_TASKS))
            .map_err(LocalStoreError::from)?;
        let mut rows = stmt.query(()).map_err(LocalStoreError::from)?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().map_err(LocalStoreError::from)? {
            tasks.push(row_to_task(row)?);
        }
        Ok(tasks)
    }

    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task> {
        let id = uuid::Uuid::new_v4().to_string();
        // stored with microsecond precision
        let created_at = Utc::now().trunc_subsecs(6);
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tasks (id, text, completed, due_date, priority, created_at) VALUES (?1, ?2, 0, ?3, ?4, ?5)",
            params![
                id,
                new_task.text,
                format_date(new_task.due_date),
                new_task.priority.as_str(),
                created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )
        .map_err(LocalStoreError::from)?;

        Ok(Task::from_new(id, new_task.clone(), created_at))
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute(
                "UPDATE tasks SET text = COALESCE(?2, text), completed = COALESCE(?3, completed) WHERE id = ?1",
                params![id, patch.text, patch.completed.map(i64::from)],
            )
            .map_err(LocalStoreError::from)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(LocalStoreError::from)?;

        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
