//! DeleteBoard operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::store::TaskFilter;
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::{error, info};

/// Delete a board and every task on it.
///
/// The board goes first. If removing its tasks then fails, the error is
/// `PartialCascadeFailure` so the leftover tasks can be cleaned up.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteBoard {
    pub id: BoardId,
}

operation!(DeleteBoard, verb = "delete", noun = "board", description = "Delete a board and its tasks");

impl DeleteBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let repo = ctx.repo();
            let board = repo.delete_board(&self.id).await?;

            let deleted = repo
                .delete_tasks(&TaskFilter::board(&board.id))
                .await
                .map_err(|source| {
                    error!(board_id = %board.id, error = %source, "Board deleted but its tasks remain");
                    BoardError::PartialCascadeFailure {
                        board: board.id.to_string(),
                        source,
                    }
                })?;

            info!(board_id = %board.id, tasks = deleted, "Deleted board");
            Ok(json!({
                "deleted": true,
                "id": board.id,
                "tasks_deleted": deleted,
            }))
        })
        .await
    }
}
