//! ListBoards operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::unlogged;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// List the boards of an owner, oldest first, as id and name only
#[derive(Debug, Deserialize, Serialize)]
pub struct ListBoards {
    pub owner: UserId,
}

operation!(ListBoards, verb = "list", noun = "boards", description = "List the boards of an owner");

impl ListBoards {
    pub fn new(owner: impl Into<UserId>) -> Self {
        Self {
            owner: owner.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListBoards {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        unlogged(async {
            let boards = ctx.repo().find_boards_by_owner(&self.owner).await?;
            let summaries: Vec<Value> = boards
                .iter()
                .map(|b| json!({"id": b.id, "name": b.name}))
                .collect();

            Ok(json!({
                "boards": summaries,
                "count": summaries.len(),
            }))
        })
        .await
    }
}
