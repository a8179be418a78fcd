//! Audit records for executed operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use ulid::Ulid;

/// How a recorded operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    #[default]
    Ok,
    Failed,
}

/// One line of the activity log
///
/// Entries are opened with [`LogEntry::new`] when an operation starts and
/// closed with [`LogEntry::completed`] or [`LogEntry::failed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Ulid,
    pub timestamp: DateTime<Utc>,
    /// Op string such as "move task"
    pub op: String,
    /// The operation's own serialized fields
    pub input: Value,
    /// Result value, or `{"error", "kind"}` for failures
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(op: impl Into<String>, input: Value) -> Self {
        Self {
            id: Ulid::new(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output: Value::Null,
            status: EntryStatus::Ok,
            actor: None,
            duration_ms: 0,
        }
    }

    /// Close the entry with the operation's result
    pub fn completed(self, output: Value, elapsed: Duration) -> Self {
        self.close(EntryStatus::Ok, output, elapsed)
    }

    /// Close the entry with an error payload
    pub fn failed(self, output: Value, elapsed: Duration) -> Self {
        self.close(EntryStatus::Failed, output, elapsed)
    }

    fn close(mut self, status: EntryStatus, output: Value, elapsed: Duration) -> Self {
        self.status = status;
        self.output = output;
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == EntryStatus::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completed_entry() {
        let entry = LogEntry::new("create board", json!({"name": "Roadmap"}))
            .completed(json!({"id": "b1"}), Duration::from_millis(3));
        assert_eq!(entry.duration_ms, 3);
        assert_eq!(entry.output["id"], "b1");
        assert!(entry.actor.is_none());
        assert!(!entry.is_error());
    }

    #[test]
    fn test_failed_entry_serializes_status_and_omits_missing_actor() {
        let entry = LogEntry::new("delete task", json!({}))
            .failed(json!({"error": "task not found"}), Duration::ZERO);
        let serialized = serde_json::to_string(&entry).unwrap();
        assert!(serialized.contains("\"status\":\"failed\""));
        assert!(!serialized.contains("actor"));
        assert!(entry.is_error());

        let entry = entry.with_actor("alice");
        let serialized = serde_json::to_string(&entry).unwrap();
        assert!(serialized.contains("\"actor\":\"alice\""));
    }

    #[test]
    fn test_entries_read_back_from_a_log_line() {
        let line = serde_json::to_string(
            &LogEntry::new("move task", json!({"id": "t1"})).completed(json!({}), Duration::ZERO),
        )
        .unwrap();
        let entry: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(entry.op, "move task");
        assert_eq!(entry.input["id"], "t1");
    }
}
