//! CreateBoard operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::logged;
use crate::types::{Board, ColumnSpec, UserId};
use crate::validate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};
use tracing::info;

/// Create a board for an owner, optionally with initial columns
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBoard {
    /// Board name, unique per owner ignoring case
    pub name: String,
    /// Owning user
    pub owner: UserId,
    /// Initial columns in display order. Ids are ignored; every column is new.
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

operation!(CreateBoard, verb = "create", noun = "board", description = "Create a new board");

impl CreateBoard {
    pub fn new(name: impl Into<String>, owner: impl Into<UserId>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            columns: Vec::new(),
        }
    }

    /// Set the initial columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ColumnSpec>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for CreateBoard {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        logged(self, async {
            let config = ctx.config();
            let name = validate::board_name(&self.name, config)?;
            ctx.require_owner(&self.owner).await?;

            let board = Board::new(name, self.owner.clone(), config.fallback_title());
            let columns: Vec<ColumnSpec> = self
                .columns
                .iter()
                .map(|c| ColumnSpec::new(c.title.clone()))
                .collect();

            let reconciled = ctx.reconciler().reconcile(&board, &columns).await?;
            ctx.repo().commit(reconciled.changeset).await?;

            info!(
                board_id = %reconciled.board.id,
                owner = %self.owner,
                columns = reconciled.board.columns.len(),
                "Created board"
            );
            Ok(serde_json::to_value(&reconciled.board)?)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BoardRepository;
    use crate::test_support::{setup, OWNER};
    use taskboard_config::{EngineConfig, FallbackPolicy};

    #[tokio::test]
    async fn test_create_board() {
        let (_store, ctx) = setup().await;

        let result = CreateBoard::new("  Roadmap ", OWNER)
            .with_columns(["Todo", "Doing", "Done"])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Roadmap");
        assert_eq!(result["owner"], OWNER);
        let titles: Vec<_> = result["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["todo", "doing", "done"]);
        assert_eq!(result["fallback_column"]["title"], "unassigned");
    }

    #[tokio::test]
    async fn test_lazy_board_starts_without_fallback() {
        let (_store, ctx) = setup().await;
        let result = CreateBoard::new("Empty", OWNER)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(result["columns"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_eager_board_starts_with_fallback() {
        let (_store, ctx) = setup().await;
        let ctx = ctx.with_config(EngineConfig::default().with_fallback_policy(FallbackPolicy::Eager));

        let result = CreateBoard::new("Eager", OWNER)
            .with_columns(["todo"])
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let columns = result["columns"].as_array().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[1]["id"], result["fallback_column"]["id"]);
    }

    #[tokio::test]
    async fn test_duplicate_columns_rejected() {
        let (store, ctx) = setup().await;
        let result = CreateBoard::new("Roadmap", OWNER)
            .with_columns(["todo", "TODO"])
            .execute(&ctx)
            .await;

        assert!(result.should_log());
        assert!(matches!(
            result.into_result(),
            Err(BoardError::DuplicateColumnTitle { .. })
        ));
        assert!(store
            .find_boards_by_owner(&UserId::from(OWNER))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_owner() {
        let (_store, ctx) = setup().await;
        let result = CreateBoard::new("Roadmap", "mallory")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::OwnerNotFound { .. })));
    }

    #[tokio::test]
    async fn test_name_conflict_per_owner() {
        let (store, ctx) = setup().await;
        store.register_user("bob").await;

        CreateBoard::new("Roadmap", OWNER)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = CreateBoard::new("ROADMAP", OWNER)
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(BoardError::BoardNameConflict { .. })));

        // same name, different owner
        assert!(CreateBoard::new("Roadmap", "bob")
            .execute(&ctx)
            .await
            .into_result()
            .is_ok());
    }

    #[tokio::test]
    async fn test_invalid_name() {
        let (_store, ctx) = setup().await;
        let result = CreateBoard::new("ab", OWNER).execute(&ctx).await.into_result();
        assert!(matches!(result, Err(BoardError::InvalidValue { .. })));
    }
}
