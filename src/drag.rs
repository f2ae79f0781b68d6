//! Drag-and-drop between lists.
//!
//! Each gesture walks `Idle -> Dragging -> (dropped | cancelled) -> Idle`.
//! Only the task id travels with the gesture; the task itself is always
//! resolved from the board at drop time.

use crate::board::{Board, ListId};
use crate::error::{Error, Result};
use crate::history;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task_id: String,
        origin: ListId,
        /// List currently hovered, shown with the "over" highlight.
        over: Option<ListId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped {
        task_id: String,
        from: ListId,
        to: ListId,
    },
    Cancelled,
}

pub fn moved_message(to: ListId) -> String {
    format!("Moved to {}", to.title())
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged_task(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { task_id, .. } => Some(task_id.as_str()),
            DragState::Idle => None,
        }
    }

    pub fn hovered(&self) -> Option<ListId> {
        match self.state {
            DragState::Dragging { over, .. } => over,
            DragState::Idle => None,
        }
    }

    /// Pick up `task_id`. A gesture already in flight is abandoned.
    pub fn start(&mut self, board: &Board, task_id: &str) -> Result<()> {
        let (origin, _) = board
            .locate(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        self.state = DragState::Dragging {
            task_id: task_id.to_string(),
            origin,
            over: None,
        };
        Ok(())
    }

    pub fn enter(&mut self, target: ListId) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = Some(target);
        }
    }

    pub fn leave(&mut self) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = None;
        }
    }

    pub fn cancel(&mut self) -> DropOutcome {
        self.state = DragState::Idle;
        DropOutcome::Cancelled
    }

    /// Finish the gesture on `target`.
    ///
    /// No target (or no gesture in flight) cancels: nothing moves and no
    /// history is written. Otherwise the task gets a `moved to <title>`
    /// entry and lands at the end of `target`, even when `target` is the
    /// list it already sits in.
    pub fn drop_on(&mut self, board: &mut Board, target: Option<ListId>) -> Result<DropOutcome> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { task_id, .. } = state else {
            return Ok(DropOutcome::Cancelled);
        };
        let Some(target) = target else {
            tracing::debug!(task_id = %task_id, "drop without a valid target");
            return Ok(DropOutcome::Cancelled);
        };

        let task = board
            .task_mut(&task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.clone()))?;
        history::record(task, history::moved_to(target.title()));
        let from = board.transfer(&task_id, target)?;
        tracing::info!(task_id = %task_id, from = %from, to = %target, "task moved");

        Ok(DropOutcome::Dropped {
            task_id,
            from,
            to: target,
        })
    }
}
