//! Store Client Layer
//!
//! Defines the abstract interface the controller talks to.
//! Implementations can use a hosted REST API, in-memory, SQLite, etc.

mod memory;
mod rest;

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::models::{NewTask, Task, TaskPatch};

pub use memory::MemoryTaskStore;
pub use rest::{RestConfig, RestTaskStore, DEFAULT_TABLE, DEFAULT_TIMEOUT};

/// The four calls against the single "tasks" collection.
///
/// Every call is a durable change on success. None of them retry.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All rows, ascending by creation time
    async fn list_all(&self) -> StoreResult<Vec<Task>>;

    /// Create one row with `completed = false` and return it with its assigned id.
    /// Callers never pass blank text.
    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task>;

    /// Apply a partial change to the row with `id`
    async fn update(&self, id: &str, patch: &TaskPatch) -> StoreResult<()>;

    /// Remove the row with `id`
    async fn delete(&self, id: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    async fn list_all(&self) -> StoreResult<Vec<Task>> {
        (**self).list_all().await
    }

    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task> {
        (**self).insert(new_task).await
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> StoreResult<()> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
