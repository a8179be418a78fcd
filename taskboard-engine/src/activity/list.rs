//! ListActivity operation

use crate::context::BoardContext;
use crate::error::BoardError;
use crate::outcome::unlogged;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_operations::{async_trait, operation, Execute, ExecutionResult};

/// Read the activity log, newest first
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListActivity {
    pub limit: Option<usize>,
}

operation!(ListActivity, verb = "list", noun = "activity", description = "Read recent activity");

impl ListActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[async_trait]
impl Execute<BoardContext, BoardError> for ListActivity {
    async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
        unlogged(async {
            let entries = ctx.repo().read_activity(self.limit).await?;
            Ok(json!({
                "entries": entries,
                "count": entries.len(),
            }))
        })
        .await
    }
}
