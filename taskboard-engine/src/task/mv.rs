//! MoveTask operation

use crate::allocator::{move_across_columns, reorder_within_column};
use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::store::{Changeset, Extreme};
use crate::types::{BoardId, ColumnId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::debug;

/// Move a task to a position in its own column or in another column of the
/// same board.
///
/// Without a position the task goes to the end of the column. Positions past
/// the end clamp to the end. Sibling renumbering and the task's own placement
/// are committed as one unit.
#[derive(Debug, Deserialize, Serialize)]
pub struct MoveTask {
    pub id: TaskId,
    pub column: ColumnId,
    pub position: Option<usize>,
    /// Board the caller expects the task to be on. A task never changes
    /// boards, so a different board is rejected.
    pub board: Option<BoardId>,
}

operation!(MoveTask, verb = "move", noun = "task", description = "Move a task within or across columns");

impl MoveTask {
    /// Move to the end of a column
    pub fn to_column(id: impl Into<TaskId>, column: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
            position: None,
            board: None,
        }
    }

    /// Move to a position in a column
    pub fn to_position(id: impl Into<TaskId>, column: impl Into<ColumnId>, position: usize) -> Self {
        Self {
            position: Some(position),
            ..Self::to_column(id, column)
        }
    }

    /// Set the board the task is expected to be on
    pub fn on_board(mut self, board: impl Into<BoardId>) -> Self {
        self.board = Some(board.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for MoveTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let repo = ctx.repo();
            let mut task = ctx.read_task(&self.id).await?;

            if let Some(board) = &self.board {
                if board != &task.board {
                    return Err(BoardError::BoardMismatch {
                        task: task.id.to_string(),
                        board: task.board.to_string(),
                    });
                }
            }

            let board = ctx.read_board(&task.board).await?;
            if !board.has_column(&self.column) {
                return Err(BoardError::InvalidColumn {
                    board: board.id.to_string(),
                    column: self.column.to_string(),
                });
            }

            let destination_max = repo
                .find_task_extreme_position(&task.board, &self.column, Extreme::Max)
                .await?
                .map(|t| t.position);

            let mut changeset = Changeset::new();
            if self.column == task.column {
                let max = destination_max.unwrap_or(task.position);
                let plan = reorder_within_column(task.position, self.position.unwrap_or(max), max);
                let Some(shift) = plan.shift else {
                    debug!(task_id = %task.id, position = task.position, "Move leaves task in place");
                    return Ok(serde_json::to_value(&task)?);
                };
                changeset.shift(shift.in_column(&task.board, &task.column));
                task.place(self.column.clone(), plan.position);
            } else {
                let plan = move_across_columns(task.position, destination_max, self.position);
                changeset.shift(plan.source.in_column(&task.board, &task.column));
                if let Some(shift) = plan.destination {
                    changeset.shift(shift.in_column(&task.board, &self.column));
                }
                task.place(self.column.clone(), plan.position);
            }

            changeset.save(task.clone());
            let summary = repo.commit(changeset).await?;
            debug!(
                task_id = %task.id,
                column_id = %task.column,
                position = task.position,
                shifted = summary.shifted,
                "Moved task"
            );
            Ok(serde_json::to_value(&task)?)
        })
        .await
    }
}
