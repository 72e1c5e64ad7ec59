//! Local Task Store
//!
//! SQLite-backed implementation of the tasklist store contract, for running
//! without a hosted backend. Same four calls, no network failure mode.

mod db;
mod task_repo;

#[cfg(test)]
mod tests;

pub use db::{open, open_in_memory, LocalStoreError};
pub use task_repo::SqliteTaskStore;
