//! Core types for the taskboard engine

mod board;
mod ids;
mod task;

pub use board::{normalize_title, Board, Column, ColumnSpec};
pub use ids::{BoardId, ColumnId, SubtaskId, TaskId, UserId};
pub use task::{Subtask, Task};
