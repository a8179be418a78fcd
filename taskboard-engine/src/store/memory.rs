//! In-memory repository

use super::state::StoreState;
use super::{
    BoardRepository, Changeset, CommitSummary, Extreme, OwnerDirectory, PositionShift,
    Repository, StoreResult, TaskFilter, TaskRepository,
};
use crate::types::{Board, BoardId, ColumnId, Task, TaskId, UserId};
use async_trait::async_trait;
use std::collections::HashSet;
use taskboard_operations::LogEntry;
use tokio::sync::RwLock;
use tracing::trace;

/// Repository keeping every document in process memory.
///
/// Commits run under the write lock against a copy of the state, so readers
/// see either the state before or after a changeset, never a mix. Also acts
/// as an [`OwnerDirectory`] for users registered with
/// [`register_user`](Self::register_user).
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
    users: RwLock<HashSet<UserId>>,
    activity: RwLock<Vec<LogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a user resolvable as a board owner
    pub async fn register_user(&self, id: impl Into<UserId>) -> UserId {
        let id = id.into();
        self.users.write().await.insert(id.clone());
        id
    }

    /// Forget a user
    pub async fn remove_user(&self, id: &UserId) -> bool {
        self.users.write().await.remove(id)
    }
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn find_board(&self, id: &BoardId) -> StoreResult<Board> {
        self.state.read().await.board(id).cloned()
    }

    async fn find_boards_by_owner(&self, owner: &UserId) -> StoreResult<Vec<Board>> {
        Ok(self.state.read().await.boards_by_owner(owner))
    }

    async fn save_board(&self, board: &Board) -> StoreResult<Board> {
        self.state.write().await.put_board(board.clone())?;
        Ok(board.clone())
    }

    async fn delete_board(&self, id: &BoardId) -> StoreResult<Board> {
        self.state.write().await.remove_board(id)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn find_task(&self, id: &TaskId) -> StoreResult<Task> {
        self.state.read().await.task(id).cloned()
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        Ok(self.state.read().await.tasks(filter))
    }

    async fn find_task_extreme_position(
        &self,
        board: &BoardId,
        column: &ColumnId,
        extreme: Extreme,
    ) -> StoreResult<Option<Task>> {
        let filter = TaskFilter::board(board).in_column(column);
        Ok(self.state.read().await.extreme(&filter, extreme))
    }

    async fn bulk_shift_positions(&self, shift: &PositionShift) -> StoreResult<usize> {
        Ok(self.state.write().await.shift(shift))
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Task> {
        self.state.write().await.put_task(task.clone())?;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<Task> {
        self.state.write().await.remove_task(id)
    }

    async fn delete_tasks(&self, filter: &TaskFilter) -> StoreResult<usize> {
        Ok(self.state.write().await.remove_tasks(filter))
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn commit(&self, changeset: Changeset) -> StoreResult<CommitSummary> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let summary = next.apply(changeset)?;
        *state = next;

        trace!(shifted = summary.shifted, saved = summary.saved, "Committed changeset");
        Ok(summary)
    }

    async fn append_activity(&self, entry: &LogEntry) -> StoreResult<()> {
        self.activity.write().await.push(entry.clone());
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> StoreResult<Vec<LogEntry>> {
        let activity = self.activity.read().await;
        let newest_first = activity.iter().rev().cloned();
        Ok(match limit {
            Some(limit) => newest_first.take(limit).collect(),
            None => newest_first.collect(),
        })
    }
}

#[async_trait]
impl OwnerDirectory for MemoryStore {
    async fn user_exists(&self, id: &UserId) -> StoreResult<bool> {
        Ok(self.users.read().await.contains(id))
    }
}
