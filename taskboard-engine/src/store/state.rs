//! Plain in-memory document state shared by the repository adapters
//!
//! Adapters apply changesets to a copy of the state and only publish the copy
//! once every write and constraint check succeeded.

use super::{
    CommitSummary, Changeset, Constraint, Extreme, PositionShift, StoreError, StoreResult,
    TaskFilter, TaskWrite,
};
use crate::types::{Board, BoardId, Task, TaskId, UserId};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StoreState {
    pub(crate) boards: BTreeMap<BoardId, Board>,
    pub(crate) tasks: BTreeMap<TaskId, Task>,
}

impl StoreState {
    pub(crate) fn board(&self, id: &BoardId) -> StoreResult<&Board> {
        self.boards
            .get(id)
            .ok_or_else(|| StoreError::BoardNotFound { id: id.to_string() })
    }

    pub(crate) fn boards_by_owner(&self, owner: &UserId) -> Vec<Board> {
        let mut boards: Vec<Board> = self
            .boards
            .values()
            .filter(|b| &b.owner == owner)
            .cloned()
            .collect();
        boards.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        boards
    }

    pub(crate) fn put_board(&mut self, board: Board) -> StoreResult<()> {
        let key = board_name_key(&board.name);
        let clash = self
            .boards
            .values()
            .any(|b| b.id != board.id && b.owner == board.owner && board_name_key(&b.name) == key);
        if clash {
            return Err(StoreError::Constraint {
                constraint: Constraint::UniqueBoardName,
                value: board.name.trim().to_string(),
            });
        }
        self.boards.insert(board.id.clone(), board);
        Ok(())
    }

    pub(crate) fn remove_board(&mut self, id: &BoardId) -> StoreResult<Board> {
        self.boards
            .remove(id)
            .ok_or_else(|| StoreError::BoardNotFound { id: id.to_string() })
    }

    pub(crate) fn task(&self, id: &TaskId) -> StoreResult<&Task> {
        self.tasks
            .get(id)
            .ok_or_else(|| StoreError::TaskNotFound { id: id.to_string() })
    }

    /// Matching tasks ordered by position, ties broken by id
    pub(crate) fn tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        tasks
    }

    pub(crate) fn extreme(&self, filter: &TaskFilter, extreme: Extreme) -> Option<Task> {
        let matching = self.tasks.values().filter(|t| filter.matches(t));
        match extreme {
            Extreme::Min => matching.min_by_key(|t| t.position),
            Extreme::Max => matching.max_by_key(|t| t.position),
        }
        .cloned()
    }

    pub(crate) fn shift(&mut self, shift: &PositionShift) -> usize {
        let mut shifted = 0;
        for task in self.tasks.values_mut().filter(|t| shift.applies_to(t)) {
            task.position = task.position.saturating_add_signed(shift.delta);
            task.touch();
            shifted += 1;
        }
        shifted
    }

    pub(crate) fn put_task(&mut self, task: Task) -> StoreResult<()> {
        self.check_title_free(&task)?;
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    pub(crate) fn remove_task(&mut self, id: &TaskId) -> StoreResult<Task> {
        self.tasks
            .remove(id)
            .ok_or_else(|| StoreError::TaskNotFound { id: id.to_string() })
    }

    pub(crate) fn remove_tasks(&mut self, filter: &TaskFilter) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, t| !filter.matches(t));
        before - self.tasks.len()
    }

    /// Apply every write of a changeset. Title uniqueness is checked once all
    /// writes landed, so a changeset may pass through intermediate states that
    /// would violate it on their own (two tasks swapping columns).
    pub(crate) fn apply(&mut self, changeset: Changeset) -> StoreResult<CommitSummary> {
        if let Some(board) = changeset.board {
            self.put_board(board)?;
        }

        let mut summary = CommitSummary::default();
        let mut saved = BTreeSet::new();
        for write in changeset.tasks {
            match write {
                TaskWrite::Shift(shift) => summary.shifted += self.shift(&shift),
                TaskWrite::Save(task) => {
                    saved.insert(task.id.clone());
                    self.tasks.insert(task.id.clone(), task);
                    summary.saved += 1;
                }
            }
        }

        self.check_task_titles(saved.iter())?;
        Ok(summary)
    }

    fn check_task_titles<'a>(&self, ids: impl Iterator<Item = &'a TaskId>) -> StoreResult<()> {
        for id in ids {
            if let Some(task) = self.tasks.get(id) {
                self.check_title_free(task)?;
            }
        }
        Ok(())
    }

    fn check_title_free(&self, task: &Task) -> StoreResult<()> {
        let key = task.title_key();
        let clash = self.tasks.values().any(|other| {
            other.id != task.id
                && other.board == task.board
                && other.column == task.column
                && other.title_key() == key
        });
        if clash {
            return Err(StoreError::Constraint {
                constraint: Constraint::UniqueTaskTitlePerColumn,
                value: task.title.clone(),
            });
        }
        Ok(())
    }
}

fn board_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
