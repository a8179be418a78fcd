//! Operation processor trait

use crate::Execute;
use async_trait::async_trait;
use serde_json::Value;

/// Runs operations and takes care of whatever happens around them
/// (actor attribution, audit log persistence, tracing).
#[async_trait]
pub trait OperationProcessor<C, E>: Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    /// Execute the operation and return its plain result
    async fn process<O>(&self, operation: &O, ctx: &C) -> Result<Value, E>
    where
        O: Execute<C, E>;
}
