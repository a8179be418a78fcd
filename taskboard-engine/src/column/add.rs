//! AddColumns operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::types::{BoardId, ColumnSpec};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Append columns to a board.
///
/// The combined list (existing columns followed by the new ones) must pass
/// the same checks as a full column update. Nothing is removed, so no task
/// moves.
#[derive(Debug, Deserialize, Serialize)]
pub struct AddColumns {
    pub board: BoardId,
    pub columns: Vec<ColumnSpec>,
}

operation!(AddColumns, verb = "add", noun = "columns", description = "Append columns to a board");

impl AddColumns {
    pub fn new<I, S>(board: impl Into<BoardId>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSpec>,
    {
        Self {
            board: board.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for AddColumns {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let board = ctx.read_board(&self.board).await?;

            let requested: Vec<ColumnSpec> = board
                .columns
                .iter()
                .map(ColumnSpec::from)
                .chain(self.columns.iter().map(|c| ColumnSpec::new(c.title.clone())))
                .collect();

            let reconciled = ctx.reconciler().reconcile(&board, &requested).await?;
            let added = reconciled.board.columns.len().saturating_sub(board.columns.len());
            ctx.repo().commit(reconciled.changeset).await?;

            info!(board_id = %board.id, added, "Added columns");
            Ok(json!({
                "columns": reconciled.board.columns,
                "added": added,
            }))
        })
        .await
    }
}
