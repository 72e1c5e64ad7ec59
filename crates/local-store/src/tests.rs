//! Local Store Integration Tests
//!
//! Tests for SqliteTaskStore with in-memory and on-disk SQLite databases.

#[cfg(test)]
mod tests {
    use crate::{open_in_memory, SqliteTaskStore};
    use chrono::NaiveDate;
    use rusqlite::params;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tasklist_core::{
        NewTask, Priority, StoreError, TaskDraft, TaskError, TaskList, TaskPatch, TaskStore,
    };

    fn setup_test_db() -> SqliteTaskStore {
        SqliteTaskStore::open_in_memory().expect("Failed to init test DB")
    }

    #[tokio::test]
    async fn test_insert_task() {
        let store = setup_test_db();

        let created = store
            .insert(&NewTask::new("Test task", None, Priority::Medium))
            .await
            .expect("Failed to insert");

        assert!(!created.id.is_empty());
        assert_eq!(created.text, "Test task");
        assert!(!created.completed);
        assert_eq!(created.priority, Some(Priority::Medium));
    }

    #[tokio::test]
    async fn test_list_in_creation_order() {
        let store = setup_test_db();

        let first = store.insert(&NewTask::new("Task 1", None, Priority::Low)).await.unwrap();
        let second = store.insert(&NewTask::new("Task 2", None, Priority::High)).await.unwrap();
        let third = store.insert(&NewTask::new("Task 3", None, Priority::Medium)).await.unwrap();

        let tasks = store.list_all().await.expect("List failed");
        let ids: Vec<String> = tasks.into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test]
    async fn test_round_trips_optional_fields() {
        let store = setup_test_db();
        let due = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let created = store
            .insert(&NewTask::new("Dentist", Some(due), Priority::High))
            .await
            .unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].due_date, Some(due));
        assert_eq!(listed[0].priority, Some(Priority::High));
        assert_eq!(listed[0].created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_task() {
        let store = setup_test_db();
        let created = store.insert(&NewTask::new("Original", None, Priority::Medium)).await.unwrap();

        store.update(&created.id, &TaskPatch::text("Updated")).await.expect("Update failed");
        store.update(&created.id, &TaskPatch::completed(true)).await.expect("Update failed");

        let found = store.list_all().await.unwrap().remove(0);
        assert_eq!(found.text, "Updated");
        assert!(found.completed);
    }

    #[tokio::test]
    async fn test_delete_task() {
        let store = setup_test_db();
        let created = store.insert(&NewTask::new("To delete", None, Priority::Low)).await.unwrap();

        store.delete(&created.id).await.expect("Delete failed");

        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(
            store.delete(&created.id).await,
            Err(StoreError::NotFound(created.id.clone()))
        );
        assert_eq!(
            store.update(&created.id, &TaskPatch::completed(true)).await,
            Err(StoreError::NotFound(created.id))
        );
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("tasks.db");

        {
            let store = SqliteTaskStore::open(&path).expect("Failed to open");
            let list = TaskList::new(store);
            list.load().await.unwrap();
            list.add(&mut TaskDraft::new("Walk dog")).await.unwrap();
        }

        let list = TaskList::new(SqliteTaskStore::open(&path).unwrap());
        assert_eq!(list.load().await, Ok(1));
        assert_eq!(list.snapshot()[0].text, "Walk dog");
    }

    #[tokio::test]
    async fn test_controller_over_local_store() {
        let list = TaskList::new(setup_test_db());
        list.load().await.unwrap();

        let milk = list.add(&mut TaskDraft::new("Buy milk")).await.unwrap();
        let rent = list.add(&mut TaskDraft::new("Pay rent")).await.unwrap();
        list.toggle_complete(&milk.id).await.unwrap();
        list.edit_text(&rent.id, "Pay rent early").await.unwrap();
        assert_eq!(list.delete("missing").await, Err(TaskError::NotFound("missing".into())));
        list.delete(&milk.id).await.unwrap();

        assert_eq!(*list.snapshot(), list.store().list_all().await.unwrap());
        assert_eq!(list.snapshot()[0].text, "Pay rent early");
    }

    #[tokio::test]
    async fn test_corrupt_row_is_storage_error() {
        let conn = Arc::new(Mutex::new(open_in_memory().expect("Failed to init test DB")));
        let store = SqliteTaskStore::new(conn.clone());
        conn.lock()
            .await
            .execute(
                "INSERT INTO tasks (id, text, completed, due_date, priority, created_at) VALUES (?1, ?2, 0, NULL, ?3, ?4)",
                params!["x", "Odd task", "urgent", "2024-01-01T00:00:00.000000Z"],
            )
            .unwrap();

        let err = store.list_all().await.unwrap_err();
        match err {
            StoreError::Storage(message) => assert!(message.contains("corrupt row x")),
            other => panic!("unexpected error {:?}", other),
        }

        let list = TaskList::new(store);
        assert!(matches!(
            list.load().await,
            Err(TaskError::Remote(StoreError::Storage(_)))
        ));
        assert!(list.snapshot().is_empty());
        assert!(!list.is_loaded());
    }
}
