//! Derived board analytics.
//!
//! Always computed from the board as it stands; nothing is cached between
//! mutations.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::board::{Board, ListId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub total: usize,
    pub per_list_counts: BTreeMap<ListId, usize>,
    pub done_percent: u32,
}

impl Analytics {
    pub fn count(&self, list: ListId) -> usize {
        self.per_list_counts.get(&list).copied().unwrap_or(0)
    }

    /// `total: 4  To Do: 2  In Progress: 1  Done: 1  done: 25%`
    pub fn summary(&self) -> String {
        let mut segments = vec![format!("total: {}", self.total)];
        for list in ListId::ALL {
            segments.push(format!("{}: {}", list.title(), self.count(list)));
        }
        segments.push(format!("done: {}%", self.done_percent));
        segments.join("  ")
    }
}

pub fn compute(board: &Board) -> Analytics {
    let per_list_counts: BTreeMap<ListId, usize> = board
        .lists()
        .iter()
        .map(|list| (list.id(), list.tasks().len()))
        .collect();
    let total = per_list_counts.values().sum();
    let done = per_list_counts.get(&ListId::Done).copied().unwrap_or(0);
    Analytics {
        total,
        per_list_counts,
        done_percent: done_percent(done, total),
    }
}

/// `round(100 * done / total)`, halves rounded up; 0 for an empty board.
fn done_percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = done as u64;
    let total = total as u64;
    ((200 * done + total) / (2 * total)) as u32
}
