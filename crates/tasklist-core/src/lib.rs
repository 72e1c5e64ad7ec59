//! Task List Core
//!
//! Layered the same way as the application:
//! - models: task entity and request payloads
//! - remote: the store client trait and its backends
//! - store: the session controller that reconciles local state with the store

pub mod error;
pub mod models;
pub mod remote;
pub mod store;

mod in_flight;

pub use error::{ConfigError, StoreError, StoreResult, TaskError, TaskResult};
pub use models::{NewTask, Priority, Task, TaskDraft, TaskPatch, TaskSummary};
pub use remote::{MemoryTaskStore, RestConfig, RestTaskStore, TaskStore};
pub use store::{Snapshot, TaskList};
