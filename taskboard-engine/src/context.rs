//! BoardContext - access to storage, the owner directory and configuration
//!
//! The context holds no board state between operations. Every operation
//! re-reads what it needs through the repository.

use crate::error::{BoardError, Result};
use crate::reconcile::Reconciler;
use crate::store::{FileStore, MemoryStore, OwnerDirectory, Repository};
use crate::types::{Board, BoardId, Task, TaskId, UserId};
use std::sync::Arc;
use taskboard_config::{ConfigProvider, EngineConfig};
use tracing::debug;

/// Context passed to every operation - provides access, not logic
#[derive(Clone)]
pub struct BoardContext {
    repo: Arc<dyn Repository>,
    owners: Arc<dyn OwnerDirectory>,
    config: EngineConfig,
}

impl BoardContext {
    /// Create a context over a repository and an owner directory
    pub fn new(repo: Arc<dyn Repository>, owners: Arc<dyn OwnerDirectory>) -> Self {
        Self {
            repo,
            owners,
            config: EngineConfig::default(),
        }
    }

    /// Create a context backed by a single in-memory store, which also
    /// serves as the owner directory
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store)
    }

    /// Create a context storing documents under `config.storage.root`
    pub fn file_backed(config: EngineConfig, owners: Arc<dyn OwnerDirectory>) -> Self {
        let store = FileStore::new(&config.storage.root);
        Self::new(Arc::new(store), owners).with_config(config)
    }

    /// Load configuration through `provider` and open the file store it names
    pub fn load(provider: &ConfigProvider, owners: Arc<dyn OwnerDirectory>) -> Result<Self> {
        let config = provider.load()?;
        debug!(root = %config.storage.root.display(), "Opening file-backed board store");
        Ok(Self::file_backed(config, owners))
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repo(&self) -> &dyn Repository {
        self.repo.as_ref()
    }

    pub fn owners(&self) -> &dyn OwnerDirectory {
        self.owners.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Column reconciler bound to this context's repository and config
    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.repo(), &self.config)
    }

    // =========================================================================
    // Read helpers
    // =========================================================================

    pub async fn read_board(&self, id: &BoardId) -> Result<Board> {
        Ok(self.repo.find_board(id).await?)
    }

    pub async fn read_task(&self, id: &TaskId) -> Result<Task> {
        Ok(self.repo.find_task(id).await?)
    }

    /// Fail with `OwnerNotFound` unless the user exists
    pub async fn require_owner(&self, id: &UserId) -> Result<()> {
        if self.owners.user_exists(id).await? {
            Ok(())
        } else {
            Err(BoardError::OwnerNotFound { id: id.to_string() })
        }
    }
}

impl std::fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
