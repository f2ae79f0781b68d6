//! Task creation, text edits and deletion.
//!
//! These act on the in-memory board only; `Session` persists the result.
//! Blank text is never an error: the gesture is dropped and the outcome
//! reports `changed: false` with no message.

use chrono::Utc;

use crate::board::{Board, ListId, Task};
use crate::error::{Error, Result};
use crate::history;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub changed: bool,
    pub message: Option<String>,
    pub task_id: Option<String>,
}

impl ActionOutcome {
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            message: None,
            task_id: None,
        }
    }

    pub fn changed(message: impl Into<String>, task_id: impl Into<String>) -> Self {
        Self {
            changed: true,
            message: Some(message.into()),
            task_id: Some(task_id.into()),
        }
    }
}

pub fn create_task(board: &mut Board, list: ListId, text: &str) -> Result<ActionOutcome> {
    let text = text.trim();
    if text.is_empty() {
        tracing::debug!(list = %list, "ignoring blank task");
        return Ok(ActionOutcome::unchanged());
    }

    let task_id = generate_task_id(board, list, Utc::now().timestamp_millis());
    let task = history::append(Task::new(task_id.clone(), text), history::CREATED);
    board.push(list, task)?;
    tracing::info!(task_id = %task_id, list = %list, "task created");

    Ok(ActionOutcome::changed("Task added", task_id))
}

pub fn edit_task(board: &mut Board, task_id: &str, text: &str) -> Result<ActionOutcome> {
    let text = text.trim();
    if text.is_empty() {
        tracing::debug!(task_id, "ignoring blank edit");
        return Ok(ActionOutcome::unchanged());
    }

    let task = board
        .task_mut(task_id)
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
    // Identical text still counts as an edit.
    task.text = text.to_string();
    history::record(task, history::EDITED);
    tracing::info!(task_id, "task edited");

    Ok(ActionOutcome::changed("Task updated", task_id))
}

/// Remove a task and its history for good.
pub fn delete_task(board: &mut Board, task_id: &str) -> Result<ActionOutcome> {
    let (list, _task) = board
        .remove(task_id)
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
    tracing::info!(task_id, list = %list, "task deleted");

    Ok(ActionOutcome::changed("Task deleted", task_id))
}

/// `<list>-card-<millis>`, bumping the millisecond part past any id already
/// on the board.
pub fn generate_task_id(board: &Board, list: ListId, now_millis: i64) -> String {
    let mut millis = now_millis;
    loop {
        let candidate = format!("{}-card-{}", list.as_str(), millis);
        if !board.contains(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}
