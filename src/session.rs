//! A loaded board plus its store: the handle every gesture goes through.
//!
//! Each method runs one gesture to completion under the snapshot lock:
//! re-read the snapshot, mutate the board, write the full snapshot,
//! recompute analytics, hand back the notification. Nothing is persisted
//! when a gesture is rejected or cancelled, and a gesture that fails leaves
//! the in-memory board equal to the snapshot it started from.

use serde::Serialize;

use crate::actions::{self, ActionOutcome};
use crate::analytics::{self, Analytics};
use crate::board::{Board, ListId, Task};
use crate::drag::{self, DragController, DropOutcome};
use crate::error::{Error, Result};
use crate::history;
use crate::render::{self, BoardView};
use crate::store::TaskStore;

#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub analytics: Analytics,
}

#[derive(Debug)]
pub struct Session {
    store: TaskStore,
    board: Board,
}

impl Session {
    /// Load the persisted board.
    pub fn open(store: TaskStore) -> Self {
        let board = store.load();
        Self { store, board }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn analytics(&self) -> Analytics {
        analytics::compute(&self.board)
    }

    pub fn view(&self) -> BoardView {
        render::render(&self.board)
    }

    /// Throw away the in-memory board and read the snapshot again.
    pub fn reload(&mut self) {
        self.board = self.store.load();
    }

    pub fn task(&self, task_id: &str) -> Result<&Task> {
        self.board
            .task(task_id)
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    pub fn history(&self, task_id: &str) -> Result<Vec<String>> {
        Ok(history::render(self.task(task_id)?))
    }

    pub fn create(&mut self, list: ListId, text: &str) -> Result<Outcome> {
        self.apply(|board| actions::create_task(board, list, text))
    }

    pub fn edit(&mut self, task_id: &str, text: &str) -> Result<Outcome> {
        self.apply(|board| actions::edit_task(board, task_id, text))
    }

    pub fn delete(&mut self, task_id: &str) -> Result<Outcome> {
        self.apply(|board| actions::delete_task(board, task_id))
    }

    pub fn start_drag(&self, drag: &mut DragController, task_id: &str) -> Result<()> {
        drag.start(&self.board, task_id)
    }

    /// Finish `drag` on `target`; `None` means the drop landed nowhere valid.
    pub fn drop_on(&mut self, drag: &mut DragController, target: Option<ListId>) -> Result<Outcome> {
        self.apply(|board| {
            Ok(match drag.drop_on(board, target)? {
                DropOutcome::Dropped { task_id, to, .. } => {
                    ActionOutcome::changed(drag::moved_message(to), task_id)
                }
                DropOutcome::Cancelled => ActionOutcome::unchanged(),
            })
        })
    }

    /// Drag `task_id` straight onto `target` in one gesture.
    pub fn move_task(&mut self, task_id: &str, target: Option<ListId>) -> Result<Outcome> {
        let mut drag = DragController::new();
        self.start_drag(&mut drag, task_id)?;
        self.drop_on(&mut drag, target)
    }

    /// Run `gesture` on the latest snapshot while holding the writer lock.
    ///
    /// Re-reading under the lock keeps writes made by other processes since
    /// this board was loaded. On error the board is reset to that snapshot.
    fn apply<F>(&mut self, gesture: F) -> Result<Outcome>
    where
        F: FnOnce(&mut Board) -> Result<ActionOutcome>,
    {
        let lock = self.store.lock()?;
        let current = self.store.load_held(&lock);
        let mut next = current.clone();
        let result = gesture(&mut next).and_then(|outcome| {
            if outcome.changed {
                self.store.save_held(&lock, &next)?;
            }
            Ok(outcome)
        });
        drop(lock);

        match result {
            Ok(outcome) => {
                self.board = next;
                Ok(self.outcome(outcome))
            }
            Err(err) => {
                tracing::debug!(error = %err, "gesture failed, keeping the stored board");
                self.board = current;
                Err(err)
            }
        }
    }

    fn outcome(&self, outcome: ActionOutcome) -> Outcome {
        Outcome {
            changed: outcome.changed,
            message: outcome.message,
            task_id: outcome.task_id,
            analytics: self.analytics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use crate::store::DEFAULT_STORAGE_KEY;
    use tempfile::TempDir;

    fn session(temp: &TempDir) -> Session {
        let store = TaskStore::new(
            Storage::new(temp.path().to_path_buf()),
            DEFAULT_STORAGE_KEY,
        );
        Session::open(store)
    }

    #[test]
    fn every_mutation_is_persisted() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);

        let created = session.create(ListId::Todo, "Buy milk").unwrap();
        let id = created.task_id.clone().unwrap();
        assert_eq!(created.message.as_deref(), Some("Task added"));
        assert_eq!(session.store().load(), *session.board());

        session.edit(&id, "Buy oat milk").unwrap();
        assert_eq!(session.store().load(), *session.board());

        let moved = session.move_task(&id, Some(ListId::Done)).unwrap();
        assert_eq!(moved.message.as_deref(), Some("Moved to Done"));
        assert_eq!(moved.analytics.done_percent, 100);
        assert_eq!(session.store().load(), *session.board());

        let deleted = session.delete(&id).unwrap();
        assert_eq!(deleted.analytics.total, 0);
        assert_eq!(session.store().load(), Board::new());
    }

    #[test]
    fn rejected_gestures_write_nothing() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);

        let outcome = session.create(ListId::Todo, "   ").unwrap();
        assert!(!outcome.changed);
        assert!(outcome.message.is_none());
        assert!(!session.store().snapshot_path().exists());
    }

    #[test]
    fn cancelled_drop_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        let id = session
            .create(ListId::Todo, "Stay")
            .unwrap()
            .task_id
            .unwrap();
        let snapshot = std::fs::read_to_string(session.store().snapshot_path()).unwrap();

        let outcome = session.move_task(&id, None).unwrap();
        assert!(!outcome.changed);
        assert_eq!(
            std::fs::read_to_string(session.store().snapshot_path()).unwrap(),
            snapshot
        );
        assert_eq!(session.task(&id).unwrap().history.len(), 1);
    }

    #[test]
    fn analytics_track_task_count() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        let mut ids = Vec::new();
        for (i, list) in [ListId::Todo, ListId::Todo, ListId::InProgress, ListId::Done]
            .into_iter()
            .enumerate()
        {
            let outcome = session.create(list, &format!("task {i}")).unwrap();
            assert_eq!(outcome.analytics.total, session.board().task_count());
            ids.push(outcome.task_id.unwrap());
        }
        assert_eq!(session.analytics().done_percent, 25);

        let outcome = session.delete(&ids[0]).unwrap();
        assert_eq!(outcome.analytics.total, 3);
        assert_eq!(outcome.analytics.done_percent, 33);
    }

    #[test]
    fn history_renders_for_known_task_only() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        let id = session
            .create(ListId::Todo, "Track me")
            .unwrap()
            .task_id
            .unwrap();
        session.move_task(&id, Some(ListId::InProgress)).unwrap();

        let lines = session.history(&id).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("moved to In Progress ("));
        assert!(matches!(
            session.history("ghost"),
            Err(Error::TaskNotFound(_))
        ));
    }

    #[test]
    fn failed_save_leaves_board_as_stored() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        session.create(ListId::Todo, "Saved").unwrap();

        let lock_path = crate::lock::lock_path_for(&session.store().snapshot_path());
        std::fs::remove_file(&lock_path).unwrap();
        std::fs::create_dir(&lock_path).unwrap();

        assert!(session.create(ListId::Todo, "Never written").is_err());
        assert_eq!(session.board().task_count(), 1);

        let raw = std::fs::read_to_string(session.store().snapshot_path()).unwrap();
        assert_eq!(crate::store::decode(&raw).unwrap(), *session.board());
    }

    #[test]
    fn failed_write_restores_snapshot_board() {
        let temp = TempDir::new().unwrap();
        let mut session = session(&temp);
        std::fs::create_dir(session.store().snapshot_path()).unwrap();

        assert!(session.create(ListId::Todo, "Nowhere to go").is_err());
        assert_eq!(session.board().task_count(), 0);
    }

    #[test]
    fn gestures_keep_writes_from_other_sessions() {
        let temp = TempDir::new().unwrap();
        let mut first = session(&temp);
        let mut second = session(&temp);

        first.create(ListId::Todo, "From the board").unwrap();
        second.create(ListId::Done, "From the CLI").unwrap();

        assert_eq!(second.board().task_count(), 2);
        assert_eq!(second.store().load(), *second.board());

        first.create(ListId::InProgress, "Third").unwrap();
        assert_eq!(first.board().task_count(), 3);
        assert_eq!(first.store().load(), *first.board());
    }

    #[test]
    fn gesture_on_task_deleted_elsewhere_reports_not_found() {
        let temp = TempDir::new().unwrap();
        let mut first = session(&temp);
        let mut second = session(&temp);
        let id = first
            .create(ListId::Todo, "Doomed")
            .unwrap()
            .task_id
            .unwrap();
        second.reload();
        second.delete(&id).unwrap();

        assert!(matches!(
            first.move_task(&id, Some(ListId::Done)),
            Err(Error::TaskNotFound(_))
        ));
        assert_eq!(first.board().task_count(), 0);
    }

    #[test]
    fn reload_replaces_board_from_disk() {
        let temp = TempDir::new().unwrap();
        let mut first = session(&temp);
        let mut second = session(&temp);

        first.create(ListId::Todo, "From elsewhere").unwrap();
        assert_eq!(second.board().task_count(), 0);
        second.reload();
        assert_eq!(second.board().task_count(), 1);
    }
}
