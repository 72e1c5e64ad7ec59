//! Task List State Store
//!
//! Owns the in-memory task collection for one session and keeps it consistent
//! with the backing store. Every mutation issues the store call first and only
//! touches the collection after the call reports success; on failure the
//! collection is left exactly as it was.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::{StoreError, StoreResult, TaskError, TaskResult};
use crate::in_flight::{InFlight, InFlightGuard};
use crate::models::{NewTask, Task, TaskDraft, TaskPatch, TaskSummary};
use crate::remote::{TaskStore, DEFAULT_TIMEOUT};

/// Read-only view handed to the presentation layer
pub type Snapshot = Arc<Vec<Task>>;

/// Reloads that raced a commit are retried this many times
const LOAD_ATTEMPTS: usize = 3;

/// Session controller over a [`TaskStore`]
pub struct TaskList<S> {
    store: S,
    /// Current collection. A new `Arc` is published on every commit.
    tasks: watch::Sender<Snapshot>,
    loaded: AtomicBool,
    /// Bumped under the channel lock on every committed mutation
    commits: AtomicU64,
    in_flight: InFlight,
    timeout: Duration,
}

impl<S: TaskStore> TaskList<S> {
    pub fn new(store: S) -> Self {
        let (tasks, _) = watch::channel(Snapshot::default());
        Self {
            store,
            tasks,
            loaded: AtomicBool::new(false),
            commits: AtomicU64::new(0),
            in_flight: InFlight::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Upper bound on each store call; expiry rolls the operation back
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================
    // Read Side
    // ========================

    pub fn snapshot(&self) -> Snapshot {
        self.tasks.borrow().clone()
    }

    /// Receiver that is marked changed whenever the collection is replaced
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tasks.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<Task> {
        self.tasks.borrow().iter().find(|task| task.id == id).cloned()
    }

    pub fn summary(&self) -> TaskSummary {
        TaskSummary::of(&self.tasks.borrow())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Whether a store call for `id` is currently pending
    pub fn is_pending(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    // ========================
    // Operations
    // ========================

    /// Replace the collection with the store's rows, in the order returned.
    ///
    /// Called at session start; calling it again reloads. On failure the
    /// collection is left as it was. Rows read before a concurrent mutation
    /// committed are stale and are fetched again.
    pub async fn load(&self) -> TaskResult<usize> {
        for attempt in 1..=LOAD_ATTEMPTS {
            let seen = self.commits.load(Ordering::Acquire);
            let rows = self.call("list", self.store.list_all()).await?;
            warn_on_duplicate_ids(&rows);
            let count = rows.len();

            let replaced = self.tasks.send_if_modified(|tasks| {
                if self.commits.load(Ordering::Acquire) != seen {
                    return false;
                }
                *tasks = Arc::new(rows);
                true
            });
            if replaced {
                self.loaded.store(true, Ordering::Release);
                log::info!("Loaded {} tasks", count);
                return Ok(count);
            }
            log::debug!("Commit landed during list (attempt {}), listing again", attempt);
        }
        log::warn!("Giving up reload after {} attempts", LOAD_ATTEMPTS);
        Err(TaskError::Conflict)
    }

    /// Create a task from the draft. The draft is reset only on success.
    pub async fn add(&self, draft: &mut TaskDraft) -> TaskResult<Task> {
        let text = draft.text.trim();
        if text.is_empty() {
            log::debug!("Ignoring add with blank text");
            return Err(TaskError::Validation("task text is empty".to_string()));
        }
        self.ensure_loaded()?;

        let new_task = NewTask::new(text, draft.due_date, draft.priority.unwrap_or_default());
        let created = self.call("insert", self.store.insert(&new_task)).await?;

        self.commit(|tasks| match tasks.iter().position(|task| task.id == created.id) {
            // a reload already picked the row up
            Some(pos) => tasks[pos] = created.clone(),
            None => tasks.push(created.clone()),
        });
        draft.reset();
        log::info!("Added task {}", created.id);
        Ok(created)
    }

    /// Flip the completion flag. Returns the new value.
    pub async fn toggle_complete(&self, id: &str) -> TaskResult<bool> {
        self.ensure_loaded()?;
        let _guard = self.claim(id)?;
        let current = self.require(id)?;

        let completed = !current.completed;
        self.call("update", self.store.update(id, &TaskPatch::completed(completed)))
            .await?;

        self.commit_update(id, |task| task.completed = completed);
        log::info!("Task {} completed={}", id, completed);
        Ok(completed)
    }

    /// Replace the text of a task. Blank text is rejected like in [`Self::add`].
    pub async fn edit_text(&self, id: &str, new_text: &str) -> TaskResult<()> {
        let text = new_text.trim();
        if text.is_empty() {
            return Err(TaskError::Validation("task text is empty".to_string()));
        }
        self.ensure_loaded()?;
        let _guard = self.claim(id)?;
        self.require(id)?;

        self.call("update", self.store.update(id, &TaskPatch::text(text)))
            .await?;

        self.commit_update(id, |task| task.text = text.to_string());
        log::info!("Task {} text updated", id);
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> TaskResult<()> {
        self.ensure_loaded()?;
        let _guard = self.claim(id)?;
        self.require(id)?;

        self.call("delete", self.store.delete(id)).await?;

        self.commit(|tasks| tasks.retain(|task| task.id != id));
        log::info!("Deleted task {}", id);
        Ok(())
    }

    // ========================
    // Helpers
    // ========================

    fn ensure_loaded(&self) -> TaskResult<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            log::warn!("Rejecting mutation before the task list was loaded");
            Err(TaskError::NotLoaded)
        }
    }

    fn claim(&self, id: &str) -> TaskResult<InFlightGuard> {
        self.in_flight.claim(id).ok_or_else(|| {
            log::warn!("Task {} already has an operation in flight", id);
            TaskError::Busy(id.to_string())
        })
    }

    fn require(&self, id: &str) -> TaskResult<Task> {
        self.get(id).ok_or_else(|| {
            log::warn!("Task {} is not in the list", id);
            TaskError::NotFound(id.to_string())
        })
    }

    /// Await a store call under the timeout
    async fn call<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = StoreResult<T>>,
    ) -> TaskResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                log::error!("Store {} failed: {}", op, e);
                Err(e.into())
            }
            Err(_) => {
                log::error!("Store {} timed out after {:?}", op, self.timeout);
                Err(StoreError::Timeout.into())
            }
        }
    }

    /// Publish a change to the collection and bump the commit counter
    fn commit(&self, change: impl FnOnce(&mut Vec<Task>)) {
        self.tasks.send_modify(|tasks| {
            change(Arc::make_mut(tasks));
            self.commits.fetch_add(1, Ordering::AcqRel);
        });
    }

    /// Apply `change` to every entry with `id`
    fn commit_update(&self, id: &str, change: impl Fn(&mut Task)) {
        self.commit(|tasks| {
            let mut matched = 0;
            for task in tasks.iter_mut().filter(|task| task.id == id) {
                change(task);
                matched += 1;
            }
            if matched == 0 {
                log::warn!("Task {} vanished from the list before its update was applied", id);
            }
        });
    }
}

fn warn_on_duplicate_ids(rows: &[Task]) {
    let mut seen = std::collections::HashSet::new();
    for row in rows {
        if !seen.insert(row.id.as_str()) {
            log::warn!("Store returned duplicate task id {}", row.id);
        }
    }
}
