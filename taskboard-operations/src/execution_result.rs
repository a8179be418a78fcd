//! Tagged outcome of executing an operation

use crate::LogEntry;

/// What happened when an operation ran
///
/// Mutations succeed as `Logged` and carry the audit entry the processor
/// appends to the activity log. Reads succeed as `Unlogged`. Failures of a
/// mutation keep their entry so rejected writes are audited too.
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed {
        error: E,
        log_entry: Option<LogEntry>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Drop the audit entry
    pub fn into_result(self) -> Result<T, E> {
        self.split().0
    }

    /// Separate the outcome from its audit entry
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, log_entry } => (Err(error), log_entry),
        }
    }

    pub fn log_entry(&self) -> Option<&LogEntry> {
        match self {
            Self::Logged { log_entry, .. } => Some(log_entry),
            Self::Failed { log_entry, .. } => log_entry.as_ref(),
            Self::Unlogged { .. } => None,
        }
    }

    /// Whether the activity log receives an entry
    pub fn should_log(&self) -> bool {
        self.log_entry().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn entry() -> LogEntry {
        LogEntry::new("move task", json!({})).completed(json!({}), Duration::from_millis(1))
    }

    #[test]
    fn test_logged_splits_into_value_and_entry() {
        let result: ExecutionResult<u32, String> = ExecutionResult::Logged {
            value: 7,
            log_entry: entry(),
        };
        assert!(result.should_log());

        let (value, log) = result.split();
        assert_eq!(value, Ok(7));
        assert_eq!(log.map(|e| e.op), Some("move task".to_string()));
    }

    #[test]
    fn test_unlogged_is_not_audited() {
        let result: ExecutionResult<u32, String> = ExecutionResult::Unlogged { value: 1 };
        assert!(!result.should_log());
        assert_eq!(result.into_result(), Ok(1));
    }

    #[test]
    fn test_failed_without_entry() {
        let result: ExecutionResult<u32, String> = ExecutionResult::Failed {
            error: "boom".into(),
            log_entry: None,
        };
        assert!(!result.should_log());
        assert!(result.log_entry().is_none());
        assert_eq!(result.into_result(), Err("boom".to_string()));
    }
}
