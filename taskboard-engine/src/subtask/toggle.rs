//! ToggleSubtask operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::types::{SubtaskId, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Flip the completed flag of a subtask
#[derive(Debug, Deserialize, Serialize)]
pub struct ToggleSubtask {
    pub task: TaskId,
    pub id: SubtaskId,
}

operation!(ToggleSubtask, verb = "toggle", noun = "subtask", description = "Mark a subtask done or not done");

impl ToggleSubtask {
    pub fn new(task: impl Into<TaskId>, id: impl Into<SubtaskId>) -> Self {
        Self {
            task: task.into(),
            id: id.into(),
        }
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ToggleSubtask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let mut task = ctx.read_task(&self.task).await?;
            let subtask = task
                .find_subtask_mut(&self.id)
                .ok_or_else(|| BoardError::SubtaskNotFound {
                    id: self.id.to_string(),
                })?;
            subtask.completed = !subtask.completed;

            task.touch();
            ctx.repo().save_task(&task).await?;
            Ok(serde_json::to_value(&task)?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::AddTask;
    use crate::test_support::{create_board, setup};

    #[tokio::test]
    async fn test_toggle_subtask() {
        let (_store, ctx) = setup().await;
        let board = create_board(&ctx, "Roadmap", &["todo"]).await;
        let task = AddTask::new(board.id.clone(), board.columns[0].id.clone(), "Release")
            .with_subtasks(["Tag", "Publish"])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let task_id = task["id"].as_str().unwrap();
        let subtask_id = task["subtasks"][1]["id"].as_str().unwrap();

        let result = ToggleSubtask::new(task_id, subtask_id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["subtasks"][0]["completed"], false);
        assert_eq!(result["subtasks"][1]["completed"], true);

        let result = ToggleSubtask::new(task_id, subtask_id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["subtasks"][1]["completed"], false);
    }

    #[tokio::test]
    async fn test_unknown_subtask() {
        let (_store, ctx) = setup().await;
        let board = create_board(&ctx, "Roadmap", &["todo"]).await;
        let task = AddTask::new(board.id.clone(), board.columns[0].id.clone(), "Release")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = ToggleSubtask::new(task["id"].as_str().unwrap(), "nope")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::SubtaskNotFound { .. })));
    }
}
