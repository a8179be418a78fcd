//! BoardOperationProcessor - runs operations and persists their audit trail

use crate::context::BoardContext;
use crate::error::BoardError;
use serde_json::Value;
use taskboard_operations::{async_trait, Execute, OperationProcessor};
use tracing::{debug, warn};

/// Executes operations against a [`BoardContext`], attributing logged
/// entries to an actor and appending them to the repository's activity log.
///
/// A failure to write the activity log never fails the operation itself.
#[derive(Debug, Clone, Default)]
pub struct BoardOperationProcessor {
    actor: Option<String>,
}

impl BoardOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every logged operation to this actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn actor(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[async_trait]
impl OperationProcessor<BoardContext, BoardError> for BoardOperationProcessor {
    async fn process<O>(&self, operation: &O, ctx: &BoardContext) -> Result<Value, BoardError>
    where
        O: Execute<BoardContext, BoardError>,
    {
        let op = operation.op_string();
        let (result, log_entry) = operation.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor);
            }
            if let Err(e) = ctx.repo().append_activity(&entry).await {
                warn!(op = %op, error = %e, "Failed to append activity log entry");
            }
        }

        match &result {
            Ok(_) => debug!(op = %op, actor = ?self.actor, "Operation completed"),
            Err(e) => warn!(op = %op, kind = ?e.kind(), error = %e, "Operation failed"),
        }

        result
    }
}
