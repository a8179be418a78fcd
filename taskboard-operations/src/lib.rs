//! Operation plumbing for the taskboard engine
//!
//! An operation is a plain struct whose fields are its parameters. Running it
//! against a context yields an [`ExecutionResult`]: mutations come back
//! `Logged` with a [`LogEntry`] for the activity log, reads come back
//! `Unlogged`, and failures come back `Failed`.
//!
//! ```ignore
//! use taskboard_operations::*;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! pub struct ToggleSubtask {
//!     pub task: TaskId,
//!     pub id: SubtaskId,
//! }
//!
//! operation!(ToggleSubtask, verb = "toggle", noun = "subtask", description = "Flip a subtask's completed flag");
//!
//! #[async_trait]
//! impl Execute<BoardContext, BoardError> for ToggleSubtask {
//!     async fn execute(&self, ctx: &BoardContext) -> ExecutionResult<Value, BoardError> {
//!         // ...
//!     }
//! }
//! ```
//!
//! Nothing here knows about boards; the engine supplies the context and
//! error types.

mod execution_result;
mod log;
mod operation;
mod processor;

pub use execution_result::ExecutionResult;
pub use log::{EntryStatus, LogEntry};
pub use operation::{Execute, Operation};
pub use processor::OperationProcessor;

pub use async_trait::async_trait;
pub use serde_json::Value;
