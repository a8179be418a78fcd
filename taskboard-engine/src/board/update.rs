//! UpdateBoard operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::store::Changeset;
use crate::types::{BoardId, ColumnSpec};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Rename a board and/or replace its column list.
///
/// Columns are only reconciled when `columns` is given. Entries carrying the
/// id of an existing column rename that column in place; existing columns left
/// out are removed and their tasks move to the fallback column.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateBoard {
    pub id: BoardId,
    pub name: Option<String>,
    pub columns: Option<Vec<ColumnSpec>>,
}

operation!(UpdateBoard, verb = "update", noun = "board", description = "Rename a board or replace its columns");

impl UpdateBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            columns: None,
        }
    }

    /// Set the new name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the requested column list
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSpec>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let mut board = ctx.read_board(&self.id).await?;

            if let Some(name) = &self.name {
                board.name = validate::board_name(name, ctx.config())?;
            }

            let (changeset, migrated) = match &self.columns {
                Some(columns) => {
                    let reconciled = ctx.reconciler().reconcile(&board, columns).await?;
                    board = reconciled.board;
                    (reconciled.changeset, reconciled.migrated)
                }
                None => {
                    board.touch();
                    (Changeset::new().with_board(board.clone()), 0)
                }
            };

            let summary = ctx.repo().commit(changeset).await?;
            info!(
                board_id = %board.id,
                migrated,
                saved = summary.saved,
                "Updated board"
            );

            let mut result = serde_json::to_value(&board)?;
            result["migrated_tasks"] = json!(migrated);
            Ok(result)
        })
        .await
    }
}
