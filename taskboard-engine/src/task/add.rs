//! AddTask operation

use crate::allocator::allocate_for_insert;
use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::outcome::logged;
use crate::store::Extreme;
use crate::types::{BoardId, ColumnId, Subtask, Task};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::debug;

/// Add a task at the end of a column
#[derive(Debug, Deserialize, Serialize)]
pub struct AddTask {
    pub board: BoardId,
    /// Must currently be on the board
    pub column: ColumnId,
    pub title: String,
    pub description: Option<String>,
    /// Subtask titles, all starting incomplete
    #[serde(default)]
    pub subtasks: Vec<String>,
}

operation!(AddTask, verb = "add", noun = "task", description = "Create a new task in a column");

impl AddTask {
    pub fn new(
        board: impl Into<BoardId>,
        column: impl Into<ColumnId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            column: column.into(),
            title: title.into(),
            description: None,
            subtasks: Vec::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the subtask titles
    pub fn with_subtasks<I, S>(mut self, subtasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = subtasks.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let config = ctx.config();
            let title = validate::task_title(&self.title, config)?;
            let description = validate::description(self.description.as_deref(), config)?;
            let subtasks = self
                .subtasks
                .iter()
                .map(|s| validate::subtask_title(s, config).map(Subtask::new))
                .collect::<Result<Vec<_>>>()?;

            let board = ctx.read_board(&self.board).await?;
            if !board.has_column(&self.column) {
                return Err(BoardError::InvalidColumn {
                    board: board.id.to_string(),
                    column: self.column.to_string(),
                });
            }

            let max = ctx
                .repo()
                .find_task_extreme_position(&board.id, &self.column, Extreme::Max)
                .await?
                .map(|t| t.position);

            let mut task = Task::new(title, board.id.clone(), self.column.clone(), allocate_for_insert(max))
                .with_subtasks(subtasks);
            task.description = description;

            ctx.repo().save_task(&task).await?;
            debug!(task_id = %task.id, column_id = %task.column, position = task.position, "Added task");
            Ok(serde_json::to_value(&task)?)
        })
        .await
    }
}
