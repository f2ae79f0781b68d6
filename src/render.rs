//! Board renderer: turns a board into list containers and card elements.
//!
//! The view is rebuilt from scratch on every load or mutation. Cards carry
//! only the task id; anything else is looked up on the board.

use serde::Serialize;

use crate::board::{Board, ListId};

/// What a card offers besides its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    History,
    Delete,
    Edit,
}

pub const CARD_AFFORDANCES: [Affordance; 3] =
    [Affordance::History, Affordance::Delete, Affordance::Edit];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub task_id: String,
    pub text: String,
    pub affordances: [Affordance; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListView {
    pub id: ListId,
    pub title: &'static str,
    pub cards: Vec<CardView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub lists: Vec<ListView>,
}

impl BoardView {
    pub fn list(&self, id: ListId) -> &ListView {
        &self.lists[id.index()]
    }

    pub fn card(&self, list: ListId, index: usize) -> Option<&CardView> {
        self.list(list).cards.get(index)
    }
}

pub fn render(board: &Board) -> BoardView {
    let lists = board
        .lists()
        .iter()
        .map(|list| ListView {
            id: list.id(),
            title: list.title(),
            cards: list
                .tasks()
                .iter()
                .map(|task| CardView {
                    task_id: task.id.clone(),
                    text: task.text.clone(),
                    affordances: CARD_AFFORDANCES,
                })
                .collect(),
        })
        .collect();
    BoardView { lists }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Task;

    #[test]
    fn one_container_per_list_in_fixed_order() {
        let view = render(&Board::new());
        let titles: Vec<&str> = view.lists.iter().map(|list| list.title).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Done"]);
        assert!(view.lists.iter().all(|list| list.cards.is_empty()));
    }

    #[test]
    fn cards_follow_list_order_and_carry_ids() {
        let mut board = Board::new();
        board.push(ListId::Done, Task::new("b", "second")).unwrap();
        board.push(ListId::Done, Task::new("a", "first")).unwrap();

        let view = render(&board);
        let done = view.list(ListId::Done);
        assert_eq!(done.cards.len(), 2);
        assert_eq!(done.cards[0].task_id, "b");
        assert_eq!(done.cards[1].text, "first");
        assert_eq!(done.cards[0].affordances, CARD_AFFORDANCES);
        assert!(view.card(ListId::Todo, 0).is_none());
    }
}
