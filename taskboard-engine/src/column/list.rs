//! ListColumns operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::unlogged;
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List a board's columns in display order
#[derive(Debug, Deserialize, Serialize)]
pub struct ListColumns {
    pub board: BoardId,
}

operation!(ListColumns, verb = "list", noun = "columns", description = "List the columns of a board");

impl ListColumns {
    pub fn new(board: impl Into<BoardId>) -> Self {
        Self {
            board: board.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListColumns {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        unlogged(async {
            let board = ctx.read_board(&self.board).await?;
            Ok(json!({
                "columns": board.columns,
                "fallback_column": board.fallback_column,
                "count": board.columns.len(),
            }))
        })
        .await
    }
}
