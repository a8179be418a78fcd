//! Board topology and task ordering engine
//!
//! Boards own an ordered list of columns; tasks sit in exactly one column of
//! one board at a dense position. This crate keeps two invariants intact under
//! every mutation:
//!
//! - a task's column is always one of its board's current columns
//! - the positions of the tasks sharing a `(board, column)` pair form
//!   `0..n` with no gaps or repeats (individual deletes excepted, see
//!   [`task::DeleteTask`])
//!
//! Columns removed by a board update never take their tasks with them: the
//! tasks are appended to the board's fallback column, which joins the board
//! the first time it is needed (or at creation under the eager policy).
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskboard_engine::{
//!     board::CreateBoard, task::{AddTask, MoveTask}, Board, BoardContext, Execute, MemoryStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let owner = store.register_user("alice").await;
//! let ctx = BoardContext::in_memory(store);
//!
//! let value = CreateBoard::new("Roadmap", owner)
//!     .with_columns(["todo", "doing", "done"])
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//! let board: Board = serde_json::from_value(value)?;
//!
//! let task = AddTask::new(board.id.clone(), board.columns[0].id.clone(), "Write docs")
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//!
//! MoveTask::to_position(task["id"].as_str().unwrap_or_default(), board.columns[2].id.clone(), 0)
//!     .execute(&ctx)
//!     .await
//!     .into_result()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! - [`validate`]: column set and field checks
//! - [`allocator`]: position arithmetic for insert, reorder and cross-column moves
//! - [`reconcile`]: column diffing and task migration
//! - [`store`]: repository contracts, [`MemoryStore`] and [`FileStore`]
//! - [`board`], [`column`], [`task`], [`subtask`], [`activity`]: operations

pub mod allocator;
mod context;
mod error;
mod outcome;
mod processor;
pub mod reconcile;
pub mod store;
pub mod types;
pub mod validate;

// Operation modules
pub mod activity;
pub mod board;
pub mod column;
pub mod subtask;
pub mod task;

#[cfg(test)]
mod test_support;

// Re-export Execute trait and types from operations crate
pub use taskboard_operations::{
    async_trait, Execute, ExecutionResult, LogEntry, Operation, OperationProcessor,
};

pub use taskboard_config::{EngineConfig, FallbackPolicy, LengthBound};

pub use context::BoardContext;
pub use error::{BoardError, ErrorKind, Result};
pub use processor::BoardOperationProcessor;
pub use store::{
    BoardRepository, Changeset, FileStore, MemoryStore, OwnerDirectory, Repository, StoreError,
    TaskFilter, TaskRepository,
};
pub use types::{Board, BoardId, Column, ColumnId, ColumnSpec, Subtask, SubtaskId, Task, TaskId, UserId};
