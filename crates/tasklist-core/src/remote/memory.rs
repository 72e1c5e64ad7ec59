//! In-process task store
//!
//! Same contract as the hosted store, without a network failure mode.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::TaskStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{NewTask, Task, TaskPatch};

/// Rows kept in insertion order, which is also creation order
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    rows: Mutex<Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rows
    pub fn with_rows(rows: Vec<Task>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Copy of the current rows
    pub async fn rows(&self) -> Vec<Task> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task> {
        let task = Task::from_new(uuid::Uuid::new_v4().to_string(), new_task.clone(), Utc::now());
        self.rows.lock().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> StoreResult<()> {
        let mut rows = self.rows.lock().await;
        let mut matched = false;
        for row in rows.iter_mut().filter(|row| row.id == id) {
            row.apply(patch);
            matched = true;
        }
        if matched {
            Ok(())
        } else {
            Err(StoreError::NotFound(id.to_string()))
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
