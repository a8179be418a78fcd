//! GetTask operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::unlogged;
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Get a task by id
#[derive(Debug, Deserialize, Serialize)]
pub struct GetTask {
    pub id: TaskId,
}

operation!(GetTask, verb = "get", noun = "task", description = "Retrieve a task");

impl GetTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for GetTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        unlogged(async {
            let task = ctx.read_task(&self.id).await?;
            Ok(serde_json::to_value(&task)?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_task, create_board, setup};

    #[tokio::test]
    async fn test_get_task() {
        let (_store, ctx) = setup().await;
        let board = create_board(&ctx, "Roadmap", &["todo"]).await;
        let id = add_task(&ctx, &board, &board.columns[0].id, "Task").await;

        let result = GetTask::new(id.clone())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["id"], id.as_str());
        assert_eq!(result["board"], board.id.as_str());
    }

    #[tokio::test]
    async fn test_get_missing_task() {
        let (_store, ctx) = setup().await;
        let result = GetTask::new("missing").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(BoardError::TaskNotFound { .. })));
    }
}
