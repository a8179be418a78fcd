//! UpdateTask operation

use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::outcome::logged;
use crate::types::{Subtask, TaskId};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Update a task's content. Placement is changed with `MoveTask` only.
#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTask {
    pub id: TaskId,
    pub title: Option<String>,
    /// An empty string clears the description
    pub description: Option<String>,
    /// Replace the checklist with these titles, all incomplete
    pub subtasks: Option<Vec<String>>,
}

operation!(UpdateTask, verb = "update", noun = "task", description = "Update a task's title, description or subtasks");

impl UpdateTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            subtasks: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_subtasks<I, S>(mut self, subtasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subtasks = Some(subtasks.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for UpdateTask {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let config = ctx.config();
            let mut task = ctx.read_task(&self.id).await?;

            if let Some(title) = &self.title {
                task.title = validate::task_title(title, config)?;
            }
            if let Some(description) = &self.description {
                task.description = validate::description(Some(description.as_str()), config)?;
            }
            if let Some(subtasks) = &self.subtasks {
                task.subtasks = subtasks
                    .iter()
                    .map(|s| validate::subtask_title(s, config).map(Subtask::new))
                    .collect::<Result<Vec<_>>>()?;
            }

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
    use crate::test_support::{add_task, create_board, setup};

    #[tokio::test]
    async fn test_update_task() {
        let (_store, ctx) = setup().await;
        let board = create_board(&ctx, "Roadmap", &["todo"]).await;
        let id = add_task(&ctx, &board, &board.columns[0].id, "Task").await;

        let result = UpdateTask::new(id.clone())
            .with_title("Renamed")
            .with_description("Details")
            .with_subtasks(["Step one"])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["title"], "Renamed");
        assert_eq!(result["description"], "Details");
        assert_eq!(result["subtasks"].as_array().unwrap().len(), 1);
        assert_eq!(result["position"], 0);

        let result = UpdateTask::new(id)
            .with_description("")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert!(result.get("description").is_none());
    }

    #[tokio::test]
    async fn test_rename_to_sibling_title_conflicts() {
        let (_store, ctx) = setup().await;
        let board = create_board(&ctx, "Roadmap", &["todo"]).await;
        add_task(&ctx, &board, &board.columns[0].id, "First").await;
        let id = add_task(&ctx, &board, &board.columns[0].id, "Second").await;

        let result = UpdateTask::new(id)
            .with_title("first")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::TaskTitleConflict { .. })));
    }
}
