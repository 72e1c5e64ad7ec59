//! Plain-text rendering of a task list snapshot

use std::fmt::Write;

use tasklist_core::{Task, TaskSummary};

fn render_task(out: &mut String, task: &Task) {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let _ = write!(out, "{} {}", mark, task.text);

    let mut details = Vec::new();
    if let Some(due) = task.due_date {
        details.push(format!("due {}", due.format("%Y-%m-%d")));
    }
    if let Some(priority) = task.priority {
        details.push(priority.to_string());
    }
    if !details.is_empty() {
        let _ = write!(out, "  ({})", details.join(", "));
    }
    let _ = writeln!(out, "  #{}", task.id);
}

pub fn render(tasks: &[Task]) -> String {
    let mut out = String::new();
    if tasks.is_empty() {
        out.push_str("No tasks yet. Add one with `tasklist add`.\n");
        return out;
    }
    for task in tasks {
        render_task(&mut out, task);
    }
    let summary = TaskSummary::of(tasks);
    let noun = if summary.total == 1 { "task" } else { "tasks" };
    let _ = writeln!(
        out,
        "{} {}, {} completed, {} remaining",
        summary.total, noun, summary.completed, summary.remaining
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tasklist_core::Priority;

    #[test]
    fn test_render_empty() {
        assert!(render(&[]).starts_with("No tasks yet"));
    }

    #[test]
    fn test_footer_singular() {
        let task = Task {
            id: "a".into(),
            text: "Buy milk".into(),
            completed: false,
            due_date: None,
            priority: None,
            created_at: None,
        };
        assert!(render(&[task]).ends_with("1 task, 0 completed, 1 remaining\n"));
    }

    #[test]
    fn test_render_rows_and_footer() {
        let tasks = vec![
            Task {
                id: "a".into(),
                text: "Buy milk".into(),
                completed: true,
                due_date: NaiveDate::from_ymd_opt(2024, 5, 1),
                priority: Some(Priority::High),
                created_at: None,
            },
            Task {
                id: "b".into(),
                text: "Pay rent".into(),
                completed: false,
                due_date: None,
                priority: None,
                created_at: None,
            },
        ];

        let out = render(&tasks);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[x] Buy milk  (due 2024-05-01, high)  #a");
        assert_eq!(lines[1], "[ ] Pay rent  #b");
        assert_eq!(lines[2], "2 tasks, 1 completed, 1 remaining");
    }
}
