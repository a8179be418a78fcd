//! Repository contracts and adapters
//!
//! The engine never talks to a database directly. It reads and writes through
//! the [`BoardRepository`] and [`TaskRepository`] capabilities, and applies every
//! multi-document change through [`Repository::commit`], which adapters must
//! apply as one unit: either every write in a [`Changeset`] becomes visible or
//! none does.
//!
//! Two adapters ship with the crate:
//!
//! - [`MemoryStore`] keeps everything behind a `tokio::sync::RwLock`
//! - [`FileStore`] keeps one JSON document per board and per task on disk

mod file;
mod memory;
mod state;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::types::{Board, BoardId, ColumnId, Task, TaskId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_operations::LogEntry;
use thiserror::Error;

/// Result type for repository operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage-level unique constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Board names are unique per owner, ignoring case
    UniqueBoardName,
    /// Task titles are unique per (board, column), ignoring case
    UniqueTaskTitlePerColumn,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniqueBoardName => f.write_str("unique board name per owner"),
            Self::UniqueTaskTitlePerColumn => f.write_str("unique task title per column"),
        }
    }
}

/// Errors raised by repository adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    #[error("constraint violated ({constraint}): {value}")]
    Constraint { constraint: Constraint, value: String },

    /// The store could not be reached or is busy
    #[error("store unavailable: {message}")]
    Unavailable { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Selects tasks by board and/or column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnId>,
}

impl TaskFilter {
    /// Every task
    pub fn all() -> Self {
        Self::default()
    }

    /// Tasks of one board
    pub fn board(board: impl Into<BoardId>) -> Self {
        Self {
            board: Some(board.into()),
            column: None,
        }
    }

    /// Narrow to one column
    pub fn in_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.board.as_ref().map_or(true, |b| &task.board == b)
            && self.column.as_ref().map_or(true, |c| &task.column == c)
    }
}

/// Which end of a column to look at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

/// Inclusive range of positions; an open end reaches past the last task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRange {
    pub start: usize,
    pub end: Option<usize>,
}

impl ShiftRange {
    /// `[start, ∞)`
    pub fn from(start: usize) -> Self {
        Self { start, end: None }
    }

    /// `[start, end]`
    pub fn between(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn contains(&self, position: usize) -> bool {
        position >= self.start && self.end.map_or(true, |end| position <= end)
    }
}

/// Add `delta` to the position of every task of `(board, column)` whose
/// position falls within `range`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionShift {
    pub board: BoardId,
    pub column: ColumnId,
    pub range: ShiftRange,
    pub delta: isize,
}

impl PositionShift {
    pub fn new(board: BoardId, column: ColumnId, range: ShiftRange, delta: isize) -> Self {
        Self {
            board,
            column,
            range,
            delta,
        }
    }

    /// Whether this shift moves the given task
    pub fn applies_to(&self, task: &Task) -> bool {
        task.board == self.board && task.column == self.column && self.range.contains(task.position)
    }
}

/// One write inside a [`Changeset`]
#[derive(Debug, Clone, PartialEq)]
pub enum TaskWrite {
    Shift(PositionShift),
    Save(Task),
}

/// Writes applied together by [`Repository::commit`], in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    pub board: Option<Board>,
    pub tasks: Vec<TaskWrite>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save this board as part of the unit
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = Some(board);
        self
    }

    pub fn shift(&mut self, shift: PositionShift) {
        self.tasks.push(TaskWrite::Shift(shift));
    }

    pub fn save(&mut self, task: Task) {
        self.tasks.push(TaskWrite::Save(task));
    }

    pub fn is_empty(&self) -> bool {
        self.board.is_none() && self.tasks.is_empty()
    }
}

/// What a commit changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub shifted: usize,
    pub saved: usize,
}

/// Read/write access to boards
#[async_trait]
pub trait BoardRepository: Send + Sync {
    async fn find_board(&self, id: &BoardId) -> StoreResult<Board>;

    async fn find_boards_by_owner(&self, owner: &UserId) -> StoreResult<Vec<Board>>;

    /// Insert or replace a board; fails on [`Constraint::UniqueBoardName`]
    async fn save_board(&self, board: &Board) -> StoreResult<Board>;

    /// Remove a board, returning what was removed
    async fn delete_board(&self, id: &BoardId) -> StoreResult<Board>;
}

/// Read/write access to tasks
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_task(&self, id: &TaskId) -> StoreResult<Task>;

    /// Matching tasks in ascending position order
    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// The first or last task of a column
    async fn find_task_extreme_position(
        &self,
        board: &BoardId,
        column: &ColumnId,
        extreme: Extreme,
    ) -> StoreResult<Option<Task>>;

    /// Apply one shift, returning how many tasks moved
    async fn bulk_shift_positions(&self, shift: &PositionShift) -> StoreResult<usize>;

    /// Insert or replace a task; fails on [`Constraint::UniqueTaskTitlePerColumn`]
    async fn save_task(&self, task: &Task) -> StoreResult<Task>;

    async fn delete_task(&self, id: &TaskId) -> StoreResult<Task>;

    /// Remove matching tasks, returning how many were removed
    async fn delete_tasks(&self, filter: &TaskFilter) -> StoreResult<usize>;
}

/// The full repository capability the engine runs against
#[async_trait]
pub trait Repository: BoardRepository + TaskRepository {
    /// Apply a changeset as one unit
    async fn commit(&self, changeset: Changeset) -> StoreResult<CommitSummary>;

    async fn append_activity(&self, entry: &LogEntry) -> StoreResult<()>;

    /// Activity entries, newest first
    async fn read_activity(&self, limit: Option<usize>) -> StoreResult<Vec<LogEntry>>;
}

/// Resolves board owners; user management lives outside the engine
#[async_trait]
pub trait OwnerDirectory: Send + Sync {
    async fn user_exists(&self, id: &UserId) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_range() {
        let open = ShiftRange::from(2);
        assert!(!open.contains(1));
        assert!(open.contains(2));
        assert!(open.contains(1_000));

        let closed = ShiftRange::between(1, 3);
        assert!(closed.contains(1));
        assert!(closed.contains(3));
        assert!(!closed.contains(4));
    }

    #[test]
    fn test_filter_matches() {
        let task = Task::new("a", BoardId::from("b1"), ColumnId::from("c1"), 0);
        assert!(TaskFilter::all().matches(&task));
        assert!(TaskFilter::board("b1").matches(&task));
        assert!(TaskFilter::board("b1").in_column("c1").matches(&task));
        assert!(!TaskFilter::board("b1").in_column("c2").matches(&task));
        assert!(!TaskFilter::board("b2").matches(&task));
    }

    #[test]
    fn test_shift_applies_to_board_and_column_only() {
        let shift = PositionShift::new(
            BoardId::from("b1"),
            ColumnId::from("c1"),
            ShiftRange::from(1),
            -1,
        );
        let inside = Task::new("a", BoardId::from("b1"), ColumnId::from("c1"), 1);
        let other_column = Task::new("b", BoardId::from("b1"), ColumnId::from("c2"), 1);
        let before_range = Task::new("c", BoardId::from("b1"), ColumnId::from("c1"), 0);
        assert!(shift.applies_to(&inside));
        assert!(!shift.applies_to(&other_column));
        assert!(!shift.applies_to(&before_range));
    }
}
