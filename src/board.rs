//! Board data model.
//!
//! A board always holds exactly three lists (`list1`, `list2`, `list3`).
//! Every task lives in exactly one of them and task ids are unique across
//! the whole board, not just within a list.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::HistoryEntry;
use crate::timestamp;

/// One of the three fixed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ListId {
    #[serde(rename = "list1")]
    Todo,
    #[serde(rename = "list2")]
    InProgress,
    #[serde(rename = "list3")]
    Done,
}

impl ListId {
    /// Display order.
    pub const ALL: [ListId; 3] = [ListId::Todo, ListId::InProgress, ListId::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            ListId::Todo => "list1",
            ListId::InProgress => "list2",
            ListId::Done => "list3",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ListId::Todo => "To Do",
            ListId::InProgress => "In Progress",
            ListId::Done => "Done",
        }
    }

    pub fn index(self) -> usize {
        match self {
            ListId::Todo => 0,
            ListId::InProgress => 1,
            ListId::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListId {
    type Err = Error;

    /// Accepts list ids (`list2`) and titles (`in progress`), case-insensitive.
    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        ListId::ALL
            .into_iter()
            .find(|id| normalized == id.as_str() || normalized == id.title().to_ascii_lowercase())
            .ok_or_else(|| Error::ListNotFound(value.trim().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(rename = "createdAt", with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Task {
    /// A task with an empty history, created now.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            created_at: timestamp::now(),
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    id: ListId,
    tasks: Vec<Task>,
}

impl List {
    fn new(id: ListId) -> Self {
        Self {
            id,
            tasks: Vec::new(),
        }
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.id.title()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    lists: [List; 3],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Three empty lists.
    pub fn new() -> Self {
        Self {
            lists: ListId::ALL.map(List::new),
        }
    }

    pub fn lists(&self) -> &[List] {
        &self.lists
    }

    pub fn list(&self, id: ListId) -> &List {
        &self.lists[id.index()]
    }

    pub fn tasks(&self, id: ListId) -> &[Task] {
        self.list(id).tasks()
    }

    pub fn task_count(&self) -> usize {
        self.lists.iter().map(|list| list.tasks.len()).sum()
    }

    /// List and position currently holding `task_id`.
    pub fn locate(&self, task_id: &str) -> Option<(ListId, usize)> {
        self.lists.iter().find_map(|list| {
            list.tasks
                .iter()
                .position(|task| task.id == task_id)
                .map(|pos| (list.id, pos))
        })
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.locate(task_id).is_some()
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        let (list, pos) = self.locate(task_id)?;
        self.lists[list.index()].tasks.get(pos)
    }

    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        let (list, pos) = self.locate(task_id)?;
        self.lists[list.index()].tasks.get_mut(pos)
    }

    /// Append `task` to the end of `list`. Ids must be unique board-wide.
    pub fn push(&mut self, list: ListId, task: Task) -> Result<()> {
        if self.contains(&task.id) {
            return Err(Error::InvalidArgument(format!(
                "duplicate task id: {}",
                task.id
            )));
        }
        self.lists[list.index()].tasks.push(task);
        Ok(())
    }

    /// Take `task_id` out of the board entirely.
    pub fn remove(&mut self, task_id: &str) -> Option<(ListId, Task)> {
        let (list, pos) = self.locate(task_id)?;
        let task = self.lists[list.index()].tasks.remove(pos);
        Some((list, task))
    }

    /// Move `task_id` to the end of `dest`, returning the list it left.
    ///
    /// Transferring into the list that already holds the task moves it to
    /// the end of that list.
    pub fn transfer(&mut self, task_id: &str, dest: ListId) -> Result<ListId> {
        let (origin, task) = self
            .remove(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))?;
        self.lists[dest.index()].tasks.push(task);
        Ok(origin)
    }

    pub fn iter_tasks(&self) -> impl Iterator<Item = (ListId, &Task)> {
        self.lists
            .iter()
            .flat_map(|list| list.tasks.iter().map(move |task| (list.id, task)))
    }
}
