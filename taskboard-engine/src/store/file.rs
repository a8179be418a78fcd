//! File-backed repository
//!
//! ```text
//! root/
//! ├── .lock                 # advisory lock (fs2)
//! ├── .journal.json         # undo journal, present only mid-commit
//! ├── boards/{id}.json      # one document per board
//! ├── tasks/{id}.json       # one document per task
//! └── activity/current.jsonl
//! ```
//!
//! Every write takes the exclusive lock, loads the current documents, applies
//! the change to that snapshot and writes back only the documents that changed.
//! Reads take the shared lock, so they never interleave with a commit in
//! progress from any process using the same root.
//!
//! Before publishing, a commit records the previous contents of every document
//! it touches in the journal. A commit that fails halfway restores those
//! documents and removes the journal. If the process dies first, the journal
//! stays behind: reads see the documents as they were before the commit, and
//! the next write puts them back on disk. A commit is therefore visible in full
//! or not at all.

use super::state::StoreState;
use super::{
    BoardRepository, Changeset, CommitSummary, Extreme, PositionShift, Repository, StoreError,
    StoreResult, TaskFilter, TaskRepository,
};
use crate::types::{Board, BoardId, ColumnId, Task, TaskId, UserId};
use async_trait::async_trait;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use taskboard_operations::LogEntry;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Repository storing JSON documents under a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    lock_timeout: Duration,
}

impl FileStore {
    /// Create a store rooted at the given directory (created on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock_timeout: Duration::from_secs(5),
        }
    }

    /// How long to wait for the lock before reporting the store unavailable
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn boards_dir(&self) -> PathBuf {
        self.root.join("boards")
    }

    pub fn board_path(&self, id: &BoardId) -> PathBuf {
        self.boards_dir().join(format!("{}.json", id))
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    pub fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    pub fn activity_path(&self) -> PathBuf {
        self.root.join("activity").join("current.jsonl")
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    fn journal_path(&self) -> PathBuf {
        self.root.join(".journal.json")
    }

    fn document_path(&self, document: &DocumentRef) -> PathBuf {
        match document {
            DocumentRef::Board(id) => self.board_path(id),
            DocumentRef::Task(id) => self.task_path(id),
        }
    }

    // =========================================================================
    // Locking
    // =========================================================================

    async fn lock(&self, exclusive: bool) -> StoreResult<StoreLock> {
        fs::create_dir_all(&self.root).await?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;

        let started = Instant::now();
        loop {
            let attempt = if exclusive {
                file.try_lock_exclusive()
            } else {
                FileExt::try_lock_shared(&file)
            };
            if attempt.is_ok() {
                return Ok(StoreLock { file });
            }
            if started.elapsed() >= self.lock_timeout {
                warn!(root = %self.root.display(), "Timed out waiting for store lock");
                return Err(StoreError::unavailable(format!(
                    "lock timeout after {}ms",
                    started.elapsed().as_millis()
                )));
            }
            tokio::time::sleep(LOCK_RETRY_INTERVAL).await;
        }
    }

    // =========================================================================
    // Snapshot I/O
    // =========================================================================

    async fn load(&self) -> StoreResult<StoreState> {
        let mut state = StoreState::default();
        for board in read_documents::<Board>(&self.boards_dir()).await? {
            state.boards.insert(board.id.clone(), board);
        }
        for task in read_documents::<Task>(&self.tasks_dir()).await? {
            state.tasks.insert(task.id.clone(), task);
        }
        if let Some(journal) = self.read_journal().await? {
            debug!(documents = journal.entries.len(), "Reading around an unfinished commit");
            journal.restore(&mut state)?;
        }
        Ok(state)
    }

    /// Write back every document that differs between the snapshots
    async fn persist(&self, before: &StoreState, after: &StoreState) -> StoreResult<()> {
        let mut changes = Vec::new();
        collect_changes(&before.boards, &after.boards, DocumentRef::board, &mut changes)?;
        collect_changes(&before.tasks, &after.tasks, DocumentRef::task, &mut changes)?;
        if changes.is_empty() {
            return Ok(());
        }

        let journal = Journal {
            entries: changes
                .iter()
                .map(|c| JournalEntry {
                    document: c.document.clone(),
                    previous: c.previous.clone(),
                })
                .collect(),
        };
        write_document(&self.journal_path(), &journal).await?;

        for (published, change) in changes.iter().enumerate() {
            if let Err(error) = self.publish(&change.document, change.next.as_deref()).await {
                warn!(
                    path = %self.document_path(&change.document).display(),
                    error = %error,
                    "Commit failed while publishing, restoring previous documents"
                );
                match self.roll_back(&journal.entries[..published]).await {
                    Ok(()) => {
                        if let Err(e) = remove_document(&self.journal_path()).await {
                            warn!(error = %e, "Failed to remove commit journal");
                        }
                    }
                    Err(e) => warn!(error = %e, "Rollback incomplete, journal kept for recovery"),
                }
                return Err(error);
            }
        }

        remove_document(&self.journal_path()).await
    }

    /// Write `content` to the document, or remove it when `None`
    async fn publish(&self, document: &DocumentRef, content: Option<&str>) -> StoreResult<()> {
        let path = self.document_path(document);
        match content {
            Some(content) => atomic_write(&path, content.as_bytes()).await,
            None => remove_document(&path).await,
        }
    }

    async fn roll_back(&self, entries: &[JournalEntry]) -> StoreResult<()> {
        for entry in entries.iter().rev() {
            self.publish(&entry.document, entry.previous.as_deref()).await?;
        }
        Ok(())
    }

    async fn read_journal(&self) -> StoreResult<Option<Journal>> {
        let path = self.journal_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Undo an unfinished commit left behind by a failed process.
    /// Requires the exclusive lock.
    async fn recover(&self) -> StoreResult<()> {
        if let Some(journal) = self.read_journal().await? {
            self.roll_back(&journal.entries).await?;
            remove_document(&self.journal_path()).await?;
            info!(
                root = %self.root.display(),
                documents = journal.entries.len(),
                "Rolled back unfinished commit"
            );
        }
        Ok(())
    }

    async fn read<T>(&self, f: impl FnOnce(&StoreState) -> StoreResult<T> + Send) -> StoreResult<T> {
        let _lock = self.lock(false).await?;
        let state = self.load().await?;
        f(&state)
    }

    async fn write<T>(
        &self,
        f: impl FnOnce(&mut StoreState) -> StoreResult<T> + Send,
    ) -> StoreResult<T> {
        let _lock = self.lock(true).await?;
        self.recover().await?;
        let before = self.load().await?;
        let mut after = before.clone();
        let value = f(&mut after)?;
        self.persist(&before, &after).await?;
        Ok(value)
    }
}

/// A document addressed by kind and id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
enum DocumentRef {
    Board(BoardId),
    Task(TaskId),
}

impl DocumentRef {
    fn board(id: &BoardId) -> Self {
        Self::Board(id.clone())
    }

    fn task(id: &TaskId) -> Self {
        Self::Task(id.clone())
    }
}

/// Previous contents of every document an in-flight commit touches
#[derive(Debug, Serialize, Deserialize)]
struct Journal {
    entries: Vec<JournalEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JournalEntry {
    document: DocumentRef,
    /// `None` when the commit creates the document
    previous: Option<String>,
}

impl Journal {
    /// Put the journaled documents back into a snapshot read from disk
    fn restore(&self, state: &mut StoreState) -> StoreResult<()> {
        for entry in &self.entries {
            match (&entry.document, &entry.previous) {
                (DocumentRef::Board(id), Some(content)) => {
                    state.boards.insert(id.clone(), serde_json::from_str(content)?);
                }
                (DocumentRef::Board(id), None) => {
                    state.boards.remove(id);
                }
                (DocumentRef::Task(id), Some(content)) => {
                    state.tasks.insert(id.clone(), serde_json::from_str(content)?);
                }
                (DocumentRef::Task(id), None) => {
                    state.tasks.remove(id);
                }
            }
        }
        Ok(())
    }
}

/// One document to publish
struct Change {
    document: DocumentRef,
    previous: Option<String>,
    next: Option<String>,
}

fn collect_changes<K, V>(
    before: &BTreeMap<K, V>,
    after: &BTreeMap<K, V>,
    document: impl Fn(&K) -> DocumentRef,
    changes: &mut Vec<Change>,
) -> StoreResult<()>
where
    K: Ord,
    V: PartialEq + Serialize,
{
    for (id, next) in after {
        let previous = before.get(id);
        if previous != Some(next) {
            changes.push(Change {
                document: document(id),
                previous: previous.map(encode).transpose()?,
                next: Some(encode(next)?),
            });
        }
    }
    for (id, previous) in before.iter().filter(|(id, _)| !after.contains_key(*id)) {
        changes.push(Change {
            document: document(id),
            previous: Some(encode(previous)?),
            next: None,
        });
    }
    Ok(())
}

fn encode<T: Serialize>(document: &T) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// RAII lock guard - releases on drop
struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[async_trait]
impl BoardRepository for FileStore {
    async fn find_board(&self, id: &BoardId) -> StoreResult<Board> {
        self.read(|state| state.board(id).cloned()).await
    }

    async fn find_boards_by_owner(&self, owner: &UserId) -> StoreResult<Vec<Board>> {
        self.read(|state| Ok(state.boards_by_owner(owner))).await
    }

    async fn save_board(&self, board: &Board) -> StoreResult<Board> {
        self.write(|state| state.put_board(board.clone())).await?;
        Ok(board.clone())
    }

    async fn delete_board(&self, id: &BoardId) -> StoreResult<Board> {
        self.write(|state| state.remove_board(id)).await
    }
}

#[async_trait]
impl TaskRepository for FileStore {
    async fn find_task(&self, id: &TaskId) -> StoreResult<Task> {
        self.read(|state| state.task(id).cloned()).await
    }

    async fn find_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        self.read(|state| Ok(state.tasks(filter))).await
    }

    async fn find_task_extreme_position(
        &self,
        board: &BoardId,
        column: &ColumnId,
        extreme: Extreme,
    ) -> StoreResult<Option<Task>> {
        let filter = TaskFilter::board(board).in_column(column);
        self.read(|state| Ok(state.extreme(&filter, extreme))).await
    }

    async fn bulk_shift_positions(&self, shift: &PositionShift) -> StoreResult<usize> {
        self.write(|state| Ok(state.shift(shift))).await
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Task> {
        self.write(|state| state.put_task(task.clone())).await?;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> StoreResult<Task> {
        self.write(|state| state.remove_task(id)).await
    }

    async fn delete_tasks(&self, filter: &TaskFilter) -> StoreResult<usize> {
        self.write(|state| Ok(state.remove_tasks(filter))).await
    }
}

#[async_trait]
impl Repository for FileStore {
    async fn commit(&self, changeset: Changeset) -> StoreResult<CommitSummary> {
        let summary = self.write(|state| state.apply(changeset)).await?;
        debug!(shifted = summary.shifted, saved = summary.saved, "Committed changeset to disk");
        Ok(summary)
    }

    async fn append_activity(&self, entry: &LogEntry) -> StoreResult<()> {
        let _lock = self.lock(true).await?;
        let path = self.activity_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_activity(&self, limit: Option<usize>) -> StoreResult<Vec<LogEntry>> {
        let _lock = self.lock(false).await?;
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        // Reverse to get newest first
        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }
}

async fn read_documents<T: DeserializeOwned>(dir: &Path) -> StoreResult<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut documents = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            let content = fs::read_to_string(&path).await?;
            documents.push(serde_json::from_str(&content)?);
        }
    }
    Ok(documents)
}

async fn write_document<T: Serialize>(path: &Path, document: &T) -> StoreResult<()> {
    atomic_write(path, encode(document)?.as_bytes()).await
}

async fn remove_document(path: &Path) -> StoreResult<()> {
    match fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}
