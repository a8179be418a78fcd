//! Operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata describing an operation
///
/// Implemented with the [`operation!`](crate::operation) macro rather than by hand.
pub trait Operation {
    /// The action, e.g. "move"
    fn verb(&self) -> &'static str;

    /// The entity acted on, e.g. "task"
    fn noun(&self) -> &'static str;

    /// Human readable summary
    fn description(&self) -> &'static str;

    /// Canonical op string used in log entries ("move task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Execute an operation against a context
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
    E: Send,
{
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;
}

/// Implement [`Operation`] for a struct
///
/// ```ignore
/// operation!(MoveTask, verb = "move", noun = "task", description = "Move a task");
/// ```
#[macro_export]
macro_rules! operation {
    ($ty:ty, verb = $verb:literal, noun = $noun:literal, description = $description:literal $(,)?) => {
        impl $crate::Operation for $ty {
            fn verb(&self) -> &'static str {
                $verb
            }

            fn noun(&self) -> &'static str {
                $noun
            }

            fn description(&self) -> &'static str {
                $description
            }
        }
    };
}
