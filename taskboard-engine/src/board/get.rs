//! GetBoard operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::unlogged;
use crate::store::TaskFilter;
use crate::types::BoardId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a board with its columns and per-column task counts
#[derive(Debug, Deserialize, Serialize)]
pub struct GetBoard {
    pub id: BoardId,
}

operation!(GetBoard, verb = "get", noun = "board", description = "Retrieve a board with task counts");

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        unlogged(async {
            let board = ctx.read_board(&self.id).await?;
            let tasks = ctx.repo().find_tasks(&TaskFilter::board(&board.id)).await?;

            let mut counts: BTreeMap<String, usize> = board
                .columns
                .iter()
                .map(|c| (c.id.to_string(), 0))
                .collect();
            for task in &tasks {
                *counts.entry(task.column.to_string()).or_default() += 1;
            }

            let mut result = serde_json::to_value(&board)?;
            result["task_counts"] = serde_json::to_value(&counts)?;
            Ok(result)
        })
        .await
    }
}
