//! DeleteTask operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::types::TaskId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::debug;

/// Delete a single task.
///
/// Siblings keep their positions, so the column may have a gap afterwards.
/// New tasks still append after the highest position.
#[derive(Debug, Deserialize, Serialize)]
pub struct DeleteTask {
    pub id: TaskId,
}

operation!(DeleteTask, verb = "delete", noun = "task", description = "Delete a task");

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for DeleteTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let task = ctx.repo().delete_task(&self.id).await?;
            debug!(task_id = %task.id, column_id = %task.column, "Deleted task");
            Ok(json!({
                "deleted": true,
                "id": task.id,
                "column": task.column,
                "position": task.position,
            }))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{TaskFilter, TaskRepository};
    use crate::task::AddTask;
    use crate::test_support::{add_task, create_board, setup};

    #[tokio::test]
    async fn test_delete_leaves_siblings_in_place() {
        let (store, ctx) = setup().await;
        let board = create_board(&ctx, "Roadmap", &["todo"]).await;
        let todo = board.columns[0].id.clone();
        add_task(&ctx, &board, &todo, "aa").await;
        let middle = add_task(&ctx, &board, &todo, "bb").await;
        add_task(&ctx, &board, &todo, "cc").await;

        DeleteTask::new(middle)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let positions: Vec<_> = store
            .find_tasks(&TaskFilter::board(&board.id))
            .await
            .unwrap()
            .iter()
            .map(|t| t.position)
            .collect();
        assert_eq!(positions, vec![0, 2]);

        let result = AddTask::new(board.id.clone(), todo, "dd")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["position"], 3);
    }

    #[tokio::test]
    async fn test_delete_missing_task() {
        let (_store, ctx) = setup().await;
        let result = DeleteTask::new("missing").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(BoardError::TaskNotFound { .. })));
    }
}
