//! Task types: Task, Subtask

use super::ids::{BoardId, ColumnId, SubtaskId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task placed in one column of one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Fixed at creation
    pub board: BoardId,
    pub column: ColumnId,
    /// Zero-based rank among the tasks sharing `(board, column)`
    pub position: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task at the given placement
    pub fn new(
        title: impl Into<String>,
        board: BoardId,
        column: ColumnId,
        position: usize,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            title: title.into(),
            description: None,
            subtasks: Vec::new(),
            board,
            column,
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the subtasks
    pub fn with_subtasks(mut self, subtasks: Vec<Subtask>) -> Self {
        self.subtasks = subtasks;
        self
    }

    /// Move to a new placement
    pub fn place(&mut self, column: ColumnId, position: usize) {
        self.column = column;
        self.position = position;
        self.touch();
    }

    /// Find a subtask
    pub fn find_subtask_mut(&mut self, id: &SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| &s.id == id)
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Case-insensitive title key used by the per-column uniqueness constraint
    pub fn title_key(&self) -> String {
        self.title.to_lowercase()
    }
}

/// A checklist item on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: SubtaskId::new(),
            title: title.into(),
            completed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("Write docs", BoardId::from("b"), ColumnId::from("c"), 3)
            .with_description("all of them")
            .with_subtasks(vec![Subtask::new("intro")]);

        assert_eq!(task.position, 3);
        assert_eq!(task.description.as_deref(), Some("all of them"));
        assert!(!task.subtasks[0].completed);
    }

    #[test]
    fn test_place_updates_column_and_position() {
        let mut task = Task::new("Write docs", BoardId::from("b"), ColumnId::from("c"), 3);
        task.place(ColumnId::from("d"), 0);
        assert_eq!(task.column.as_str(), "d");
        assert_eq!(task.position, 0);
    }

    #[test]
    fn test_title_key_ignores_case() {
        let a = Task::new("Write Docs", BoardId::from("b"), ColumnId::from("c"), 0);
        let b = Task::new("write docs", BoardId::from("b"), ColumnId::from("c"), 1);
        assert_eq!(a.title_key(), b.title_key());
    }

    #[test]
    fn test_subtask_completed_defaults_false() {
        let subtask: Subtask = serde_json::from_str(r#"{"id": "s1", "title": "check"}"#).unwrap();
        assert!(!subtask.completed);
    }
}
