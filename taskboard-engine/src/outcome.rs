//! Wrapping operation bodies into `ExecutionResult`s

use crate::error::{BoardError, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::time::Instant;
use taskboard_operations::{ExecutionResult, LogEntry, Operation};

/// Run a mutating operation body and record it, successful or not
pub(crate) async fn logged<O, F>(operation: &O, body: F) -> ExecutionResult<Value, BoardError>
where
    O: Operation + Serialize,
    F: Future<Output = Result<Value>>,
{
    let started = Instant::now();
    let entry = LogEntry::new(
        operation.op_string(),
        serde_json::to_value(operation).unwrap_or(Value::Null),
    );

    match body.await {
        Ok(value) => ExecutionResult::Logged {
            log_entry: entry.completed(value.clone(), started.elapsed()),
            value,
        },
        Err(error) => {
            let output = json!({"error": error.to_string(), "kind": error.kind()});
            ExecutionResult::Failed {
                log_entry: Some(entry.failed(output, started.elapsed())),
                error,
            }
        }
    }
}

/// Run a read-only operation body
pub(crate) async fn unlogged<F>(body: F) -> ExecutionResult<Value, BoardError>
where
    F: Future<Output = Result<Value>>,
{
    match body.await {
        Ok(value) => ExecutionResult::Unlogged { value },
        Err(error) => ExecutionResult::Failed {
            error,
            log_entry: None,
        },
    }
}
