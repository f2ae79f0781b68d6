//! Task store: the board snapshot in durable storage.
//!
//! The snapshot is one record whose value is a JSON object mapping list id
//! to the ordered array of tasks in that list:
//!
//! ```json
//! {"list1":[{"id":"list1-card-1714555800000","text":"Buy milk",
//!   "createdAt":"2024-05-01T09:30:00.000Z",
//!   "history":[{"action":"created","timestamp":"2024-05-01T09:30:00.000Z"}]}],
//!  "list2":[],"list3":[]}
//! ```
//!
//! Loading never fails: a missing or unreadable snapshot is an empty board.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::board::{Board, ListId, Task};
use crate::error::Result;
use crate::lock::FileLock;
use crate::storage::Storage;

/// Storage key of the board snapshot
pub const DEFAULT_STORAGE_KEY: &str = "kanbanData";

#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
    key: String,
}

impl TaskStore {
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.storage.record_path(&self.key)
    }

    /// Hold the snapshot's writer lock for a read-modify-write.
    pub fn lock(&self) -> Result<FileLock> {
        self.storage.lock(&self.key)
    }

    /// Read the persisted board.
    ///
    /// An absent record, unreadable file or malformed JSON yields an empty
    /// board.
    pub fn load(&self) -> Board {
        self.board_or_empty(self.storage.get(&self.key))
    }

    /// `load` while holding the lock from `lock()`
    pub fn load_held(&self, lock: &FileLock) -> Board {
        self.board_or_empty(self.storage.get_held(lock, &self.key))
    }

    /// Replace the persisted snapshot with `board` in full.
    pub fn save(&self, board: &Board) -> Result<()> {
        let lock = self.lock()?;
        self.save_held(&lock, board)
    }

    /// `save` while holding the lock from `lock()`
    pub fn save_held(&self, lock: &FileLock, board: &Board) -> Result<()> {
        let encoded = encode(board)?;
        self.storage.set_held(lock, &self.key, &encoded)?;
        tracing::debug!(key = %self.key, tasks = board.task_count(), "snapshot saved");
        Ok(())
    }

    fn board_or_empty(&self, raw: Result<Option<String>>) -> Board {
        let raw = match raw {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no snapshot, starting with an empty board");
                return Board::new();
            }
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "snapshot unreadable, using an empty board");
                return Board::new();
            }
        };
        match decode(&raw) {
            Ok(board) => board,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "snapshot malformed, using an empty board");
                Board::new()
            }
        }
    }
}

/// Compact JSON for `board`, lists in fixed order.
pub fn encode(board: &Board) -> Result<String> {
    let snapshot: BTreeMap<&'static str, &[Task]> = board
        .lists()
        .iter()
        .map(|list| (list.id().as_str(), list.tasks()))
        .collect();
    Ok(serde_json::to_string(&snapshot)?)
}

/// Parse a snapshot.
///
/// Only a snapshot that is not a JSON object fails. Keys other than the three
/// list ids are ignored; a list that is missing, `null` or not an array loads
/// empty. Task records that do not decode are skipped, and so is a task whose
/// id already appeared earlier in the snapshot.
pub fn decode(raw: &str) -> Result<Board> {
    let mut object: Map<String, Value> = serde_json::from_str(raw)?;
    let mut board = Board::new();
    for list in ListId::ALL {
        let records = match object.remove(list.as_str()) {
            Some(Value::Array(records)) => records,
            None | Some(Value::Null) => continue,
            Some(_) => {
                tracing::warn!(list = %list, "list is not an array, loading it empty");
                continue;
            }
        };
        for (index, record) in records.into_iter().enumerate() {
            let task: Task = match serde_json::from_value(record) {
                Ok(task) => task,
                Err(err) => {
                    tracing::warn!(list = %list, index, error = %err, "skipping unreadable task");
                    continue;
                }
            };
            if board.contains(&task.id) {
                tracing::warn!(task_id = %task.id, list = %list, "dropping duplicate task id");
                continue;
            }
            board.push(list, task)?;
        }
    }
    for key in object.keys() {
        tracing::debug!(key = %key, "ignoring unrecognized list in snapshot");
    }
    Ok(board)
}
