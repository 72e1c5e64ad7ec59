//! Per-task in-flight registry
//!
//! At most one store call per task id may be pending at a time.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default, Clone)]
pub(crate) struct InFlight {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `id` as pending. Returns `None` when it already is.
    pub(crate) fn claim(&self, id: &str) -> Option<InFlightGuard> {
        if !self.lock().insert(id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            ids: self.clone(),
            id: id.to_string(),
        })
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.lock().contains(id)
    }
}

/// Releases the id when dropped, on every exit path
#[derive(Debug)]
pub(crate) struct InFlightGuard {
    ids: InFlight,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.ids.lock().remove(&self.id);
    }
}
