//! Board deletion when the task cascade fails

use std::sync::Arc;
use taskboard_engine::board::{CreateBoard, DeleteBoard};
use taskboard_engine::store::{CommitSummary, Extreme, PositionShift, StoreResult};
use taskboard_engine::task::AddTask;
use taskboard_engine::{
    async_trait, Board, BoardContext, BoardError, BoardId, BoardRepository, Changeset, ColumnId,
    ErrorKind, Execute, LogEntry, MemoryStore, Repository, StoreError, Task, TaskFilter, TaskId,
    TaskRepository, UserId,
};

/// Delegates to a memory store but refuses bulk task deletion
struct BrokenCascade {
    inner: Arc<MemoryStore>,
}

#[async_trait]
impl BoardRepository for BrokenCascade {
    async fn find_board(&self, id: &BoardId) -> StoreResult<Board> {
        self.inner.find_board(id).await
    }

    async fn find_boards_by_owner(&self, owner: &UserId) -> StoreResult<Vec<Board>> {
        self.inner.find_boards_by_owner(owner).await
    }

    async fn save_board(&self, board: &Board) -> StoreResult<Board> {
        self.inner.save_board(board).await
    }

    async fn delete_board(&self, id: &BoardId) -> StoreResult<Board> {
        self.inner.delete_board(id).await
    }
}

#[async_trait]
impl TaskRepository for BrokenCascade {
    async fn find_task(&self, id: &TaskId) -> StoreResult<Task> {
        self.inner.find_task(id).await
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        self.inner.find_tasks(filter).await
    }

    async fn find_task_extreme_position(
        &self,
        board: &BoardId,
        column: &ColumnId,
        extreme: Extreme,
    ) -> StoreResult<Option<Task>> {
        self.inner.find_task_extreme_position(board, column, extreme).await
    }

    async fn bulk_shift_positions(&self, shift: &PositionShift) -> StoreResult<usize> {
        self.inner.bulk_shift_positions(shift).await
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Task> {
        self.inner.save_task(task).await
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<Task> {
        self.inner.delete_task(id).await
    }

    async fn delete_tasks(&self, _filter: &TaskFilter) -> StoreResult<usize> {
        Err(StoreError::unavailable("task collection offline"))
    }
}

#[async_trait]
impl Repository for BrokenCascade {
    async fn commit(&self, changeset: Changeset) -> StoreResult<CommitSummary> {
        self.inner.commit(changeset).await
    }

    async fn append_activity(&self, entry: &LogEntry) -> StoreResult<()> {
        self.inner.append_activity(entry).await
    }

    async fn read_activity(&self, limit: Option<usize>) -> StoreResult<Vec<LogEntry>> {
        self.inner.read_activity(limit).await
    }
}

#[test_log::test(tokio::test)]
async fn failed_task_cleanup_is_reported_as_partial_cascade() {
    let inner = Arc::new(MemoryStore::new());
    inner.register_user("alice").await;
    let repo = Arc::new(BrokenCascade {
        inner: inner.clone(),
    });
    let ctx = BoardContext::new(repo, inner.clone());

    let value = CreateBoard::new("Roadmap", "alice")
        .with_columns(["todo"])
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();
    let board: Board = serde_json::from_value(value).unwrap();
    AddTask::new(board.id.clone(), board.columns[0].id.clone(), "Orphan")
        .execute(&ctx)
        .await
        .into_result()
        .unwrap();

    let result = DeleteBoard::new(board.id.clone()).execute(&ctx).await;
    assert!(result.should_log());

    let error = result.into_result().unwrap_err();
    assert_eq!(error.kind(), ErrorKind::PartialCascadeFailure);
    assert!(matches!(
        &error,
        BoardError::PartialCascadeFailure { board: id, .. } if id == board.id.as_str()
    ));

    // board is gone, its task is still there to be reconciled
    assert!(inner.find_board(&board.id).await.is_err());
    assert_eq!(
        inner
            .find_tasks(&TaskFilter::board(&board.id))
            .await
            .unwrap()
            .len(),
        1
    );
}
