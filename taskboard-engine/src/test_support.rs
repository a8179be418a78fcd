//! Shared fixtures for operation tests

use crate::board::CreateBoard;
use crate::context::BoardContext;
use crate::store::MemoryStore;
use crate::task::AddTask;
use crate::types::{Board, ColumnId, TaskId};
use std::sync::Arc;
use taskboard_operations::Execute;

pub(crate) const OWNER: &str = "alice";

/// In-memory context with one registered owner
pub(crate) async fn setup() -> (Arc<MemoryStore>, BoardContext) {
    let store = Arc::new(MemoryStore::new());
    store.register_user(OWNER).await;
    let ctx = BoardContext::in_memory(store.clone());
    (store, ctx)
}

/// Create a board owned by [`OWNER`] with the given column titles
pub(crate) async fn create_board(ctx: &BoardContext, name: &str, columns: &[&str]) -> Board {
    let value = CreateBoard::new(name, OWNER)
        .with_columns(columns.iter().copied())
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
    serde_json::from_value(value).unwrap()
}

/// Add a task and return its id
pub(crate) async fn add_task(ctx: &BoardContext, board: &Board, column: &ColumnId, title: &str) -> TaskId {
    let value = AddTask::new(board.id.clone(), column.clone(), title)
        .execute(ctx)
        .await
        .into_result()
        .unwrap();
    TaskId::from(value["id"].as_str().unwrap())
}
