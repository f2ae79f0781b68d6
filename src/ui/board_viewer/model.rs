use crate::board::{Board, ListId};

/// Selected list and card position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub list: ListId,
    pub card: usize,
}

impl Cursor {
    pub fn new(list: ListId) -> Self {
        Self { list, card: 0 }
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(ListId::Todo)
    }
}

/// Keep the card index inside the list; an empty list pins it to 0.
pub fn clamp(board: &Board, cursor: Cursor) -> Cursor {
    let len = board.tasks(cursor.list).len();
    Cursor {
        list: cursor.list,
        card: cursor.card.min(len.saturating_sub(1)),
    }
}

/// Step to a neighbouring list, wrapping around, and clamp the card.
pub fn move_list(board: &Board, cursor: Cursor, delta: isize) -> Cursor {
    let list = step_list(cursor.list, delta);
    clamp(board, Cursor { list, card: cursor.card })
}

pub fn move_card(board: &Board, cursor: Cursor, delta: isize) -> Cursor {
    let len = board.tasks(cursor.list).len();
    if len == 0 {
        return Cursor::new(cursor.list);
    }
    let card = (cursor.card as isize + delta).clamp(0, len as isize - 1) as usize;
    Cursor { list: cursor.list, card }
}

pub fn step_list(list: ListId, delta: isize) -> ListId {
    let len = ListId::ALL.len() as isize;
    let index = (list.index() as isize + delta).rem_euclid(len) as usize;
    ListId::ALL[index]
}

pub fn selected_task_id(board: &Board, cursor: Cursor) -> Option<&str> {
    board
        .tasks(cursor.list)
        .get(cursor.card)
        .map(|task| task.id.as_str())
}

/// Cursor on `task_id` if it is still on the board, else `fallback` clamped.
pub fn select_by_id(board: &Board, task_id: Option<&str>, fallback: Cursor) -> Cursor {
    task_id
        .and_then(|id| board.locate(id))
        .map(|(list, card)| Cursor { list, card })
        .unwrap_or_else(|| clamp(board, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Task;

    fn board() -> Board {
        let mut board = Board::new();
        for id in ["a", "b", "c"] {
            board.push(ListId::Todo, Task::new(id, id)).unwrap();
        }
        board.push(ListId::Done, Task::new("d", "d")).unwrap();
        board
    }

    #[test]
    fn move_card_stops_at_edges() {
        let board = board();
        let cursor = Cursor::new(ListId::Todo);
        assert_eq!(move_card(&board, cursor, -1).card, 0);
        assert_eq!(move_card(&board, cursor, 2).card, 2);
        assert_eq!(move_card(&board, cursor, 10).card, 2);
    }

    #[test]
    fn move_list_wraps_and_clamps() {
        let board = board();
        let cursor = Cursor {
            list: ListId::Todo,
            card: 2,
        };
        let left = move_list(&board, cursor, -1);
        assert_eq!(left, Cursor { list: ListId::Done, card: 0 });

        let right = move_list(&board, cursor, 1);
        assert_eq!(right, Cursor::new(ListId::InProgress));
        assert_eq!(selected_task_id(&board, right), None);
    }

    #[test]
    fn select_by_id_follows_task() {
        let board = board();
        let cursor = select_by_id(&board, Some("d"), Cursor::default());
        assert_eq!(cursor, Cursor { list: ListId::Done, card: 0 });
        assert_eq!(selected_task_id(&board, cursor), Some("d"));
    }

    #[test]
    fn select_by_id_falls_back_when_gone() {
        let board = board();
        let fallback = Cursor {
            list: ListId::Todo,
            card: 9,
        };
        assert_eq!(
            select_by_id(&board, Some("ghost"), fallback),
            Cursor { list: ListId::Todo, card: 2 }
        );
    }

    #[test]
    fn step_list_cycles_all_lists() {
        assert_eq!(step_list(ListId::Done, 1), ListId::Todo);
        assert_eq!(step_list(ListId::Todo, -1), ListId::Done);
        assert_eq!(step_list(ListId::Todo, 1), ListId::InProgress);
    }
}
