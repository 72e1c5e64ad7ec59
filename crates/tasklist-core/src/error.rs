//! Error types for store calls and controller operations

use thiserror::Error;

/// Failure reported by a store backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("no task with id {0} in store")]
    NotFound(String),
    #[error("store call timed out")]
    Timeout,
    #[error("storage error: {0}")]
    Storage(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a rejected or failed controller operation.
///
/// The in-memory collection is never changed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Remote(#[from] StoreError),
    #[error("task {0} is not in the list")]
    NotFound(String),
    #[error("task {0} already has an operation in flight")]
    Busy(String),
    #[error("task list has not been loaded yet")]
    NotLoaded,
    #[error("task list kept changing during reload, try again")]
    Conflict,
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Configuration loading failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing config value: {0}")]
    Missing(&'static str),
    #[error("invalid config value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
