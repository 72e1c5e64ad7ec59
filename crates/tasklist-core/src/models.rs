//! Task Models
//!
//! Data structures shared by the controller and every store backend.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse the lowercase wire form. Unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do entry, as stored by the backing store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier, never reused
    pub id: String,
    pub text: String,
    /// `null` reads as not completed
    #[serde(default, deserialize_with = "null_as_false")]
    pub completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Unrecognised values read as unset
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    /// Store-assigned creation time, used for list ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

fn lenient_priority<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Priority>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.and_then(|s| Priority::parse(&s)))
}

impl Task {
    /// Build the row a store returns for a fresh insert
    pub fn from_new(id: String, new_task: NewTask, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text: new_task.text,
            completed: false,
            due_date: new_task.due_date,
            priority: Some(new_task.priority),
            created_at: Some(created_at),
        }
    }

    /// Apply a partial update in place
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Insert payload. `completed` is always false on creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub text: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl NewTask {
    pub fn new(text: impl Into<String>, due_date: Option<NaiveDate>, priority: Priority) -> Self {
        Self {
            text: text.into(),
            completed: false,
            due_date,
            priority,
        }
    }
}

/// Partial field change for an existing task
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Input fields owned by the presentation layer for the "add" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Clear text and due date, reset priority to medium
    pub fn reset(&mut self) {
        self.text.clear();
        self.due_date = None;
        self.priority = Some(Priority::Medium);
    }
}

/// Counts for the list footer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TaskSummary {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.completed).count();
        Self {
            total: tasks.len(),
            completed,
            remaining: tasks.len() - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_tolerates_nullable_columns() {
        let task: Task = serde_json::from_str(
            r#"{"id": "a", "text": "Buy milk", "completed": null, "priority": "urgent"}"#,
        )
        .unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, None);

        let task: Task = serde_json::from_str(
            r#"{"id": "b", "text": "Pay rent", "completed": true, "priority": "HIGH"}"#,
        )
        .unwrap();
        assert!(task.completed);
        assert_eq!(task.priority, Some(Priority::High));
    }

    #[test]
    fn test_priority_wire_form() {
        assert_eq!(Priority::High.as_str(), "high");
        assert_eq!(Priority::parse(" Low "), Some(Priority::Low));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_task_row_deserialization() {
        let row = r#"{"id":"a","text":"Buy milk","completed":false,"due_date":"2024-05-01","priority":"high","created_at":"2024-04-30T10:00:00Z"}"#;
        let task: Task = serde_json::from_str(row).unwrap();
        assert_eq!(task.id, "a");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(task.priority, Some(Priority::High));
        assert!(task.created_at.is_some());

        let sparse: Task = serde_json::from_str(r#"{"id":"b","text":"Pay rent","due_date":null,"priority":null}"#).unwrap();
        assert!(!sparse.completed);
        assert_eq!(sparse.priority, None);
        assert_eq!(sparse.created_at, None);
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let json = serde_json::to_value(TaskPatch::completed(true)).unwrap();
        assert_eq!(json, serde_json::json!({"completed": true}));
    }

    #[test]
    fn test_draft_reset() {
        let mut draft = TaskDraft::new("Walk dog")
            .with_priority(Priority::High)
            .with_due_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        draft.reset();
        assert_eq!(draft.text, "");
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.priority, Some(Priority::Medium));
    }

    #[test]
    fn test_summary_counts() {
        let mut done = Task::from_new("a".into(), NewTask::new("x", None, Priority::Low), Utc::now());
        done.completed = true;
        let open = Task::from_new("b".into(), NewTask::new("y", None, Priority::Low), Utc::now());
        let summary = TaskSummary::of(&[done, open]);
        assert_eq!(summary, TaskSummary { total: 2, completed: 1, remaining: 1 });
    }
}
