//! Append-only per-task history.
//!
//! Every task carries its own log of actions in chronological order.
//! Entries are only ever pushed; nothing is merged, deduplicated or capped.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::board::Task;
use crate::timestamp;

pub const CREATED: &str = "created";
pub const EDITED: &str = "edited";
const MOVED_TO_PREFIX: &str = "moved to ";

/// Action recorded when a task lands in the list titled `title`.
pub fn moved_to(title: &str) -> String {
    format!("{MOVED_TO_PREFIX}{title}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: String,
    #[serde(with = "crate::timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            timestamp: timestamp::now(),
        }
    }
}

/// Push one entry onto `task`, timestamped now.
pub fn record(task: &mut Task, action: impl Into<String>) -> &HistoryEntry {
    task.history.push(HistoryEntry::new(action));
    &task.history[task.history.len() - 1]
}

/// Return `task` with one new entry appended.
pub fn append(mut task: Task, action: impl Into<String>) -> Task {
    record(&mut task, action);
    task
}

/// One display line per entry, oldest first.
pub fn render(task: &Task) -> Vec<String> {
    task.history
        .iter()
        .map(|entry| format!("{} ({})", entry.action, format_timestamp(entry.timestamp)))
        .collect()
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new("list1-card-1", "Buy milk")
    }

    #[test]
    fn append_adds_exactly_one_entry() {
        let task = append(task(), CREATED);
        assert_eq!(task.history.len(), 1);
        assert_eq!(task.history[0].action, "created");
    }

    #[test]
    fn append_keeps_duplicates_in_order() {
        let task = append(append(append(task(), CREATED), EDITED), EDITED);
        let actions: Vec<&str> = task.history.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["created", "edited", "edited"]);
        assert!(task.history[0].timestamp <= task.history[2].timestamp);
    }

    #[test]
    fn moved_to_names_destination_title() {
        let entry = HistoryEntry::new(moved_to("In Progress"));
        assert_eq!(entry.action, "moved to In Progress");
    }

    #[test]
    fn render_formats_one_line_per_entry() {
        let task = append(append(task(), CREATED), moved_to("Done"));
        let lines = render(&task);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("created ("));
        assert!(lines[1].starts_with("moved to Done ("));
        assert!(lines.iter().all(|line| line.ends_with(')')));
    }

    #[test]
    fn render_empty_history_is_empty() {
        assert!(render(&task()).is_empty());
    }
}
