//! Application-level error: everything the binary can fail with

use thiserror::Error;

use local_store::LocalStoreError;
use rolling_logger::LoggerError;
use tasklist_core::{ConfigError, TaskError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("local store: {0}")]
    Local(#[from] LocalStoreError),
    #[error(transparent)]
    Logger(#[from] LoggerError),
}
