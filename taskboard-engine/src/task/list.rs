//! ListTasks operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::unlogged;
use crate::store::TaskFilter;
use crate::types::{BoardId, ColumnId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List the tasks of a board, optionally of one column, in display order
/// (column order, then position)
#[derive(Debug, Deserialize, Serialize)]
pub struct ListTasks {
    pub board: BoardId,
    pub column: Option<ColumnId>,
}

operation!(ListTasks, verb = "list", noun = "tasks", description = "List the tasks of a board or column");

impl ListTasks {
    pub fn new(board: impl Into<BoardId>) -> Self {
        Self {
            board: board.into(),
            column: None,
        }
    }

    /// Only list one column
    pub fn in_column(mut self, column: impl Into<ColumnId>) -> Self {
        self.column = Some(column.into());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListTasks {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        unlogged(async {
            let board = ctx.read_board(&self.board).await?;

            let mut filter = TaskFilter::board(&board.id);
            if let Some(column) = &self.column {
                if !board.has_column(column) {
                    return Err(BoardError::InvalidColumn {
                        board: board.id.to_string(),
                        column: column.to_string(),
                    });
                }
                filter = filter.in_column(column);
            }

            let mut tasks = ctx.repo().find_tasks(&filter).await?;
            tasks.sort_by_key(|t| (board.column_index(&t.column).unwrap_or(usize::MAX), t.position));

            Ok(json!({
                "tasks": tasks,
                "count": tasks.len(),
            }))
        })
        .await
    }
}
