//! Board-level types: Board, Column, ColumnSpec

use super::ids::{BoardId, ColumnId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board owns an ordered list of columns. Column order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub owner: UserId,
    #[serde(default)]
    pub columns: Vec<Column>,
    /// Receives tasks orphaned by column removal. Its identity is fixed at
    /// creation; it only appears in `columns` once it is needed (or from the
    /// start under the eager policy).
    pub fallback_column: Column,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Create a board with no columns
    pub fn new(name: impl Into<String>, owner: UserId, fallback_title: impl Into<String>) -> Self {
        let now = Utc::now();
        let fallback_title: String = fallback_title.into();
        Self {
            id: BoardId::new(),
            name: name.into(),
            owner,
            columns: Vec::new(),
            fallback_column: Column::new(fallback_title),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the columns
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Find a column currently on the board
    pub fn find_column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// Check whether a column is currently on the board
    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.find_column(id).is_some()
    }

    /// Display index of a column
    pub fn column_index(&self, id: &ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }

    /// Whether the fallback column is currently part of the column list
    pub fn has_fallback_column(&self) -> bool {
        self.has_column(&self.fallback_column.id)
    }

    /// Bump the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A column is a named bucket of tasks within one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
}

impl Column {
    /// Create a column with a fresh id and a normalized title
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            id: ColumnId::new(),
            title: normalize_title(title.as_ref()),
        }
    }

    /// Create a column with a known id
    pub fn with_id(id: ColumnId, title: impl AsRef<str>) -> Self {
        Self {
            id,
            title: normalize_title(title.as_ref()),
        }
    }
}

/// A requested column: a title, plus an id when the caller refers to an
/// existing column (rename-in-place) rather than asking for a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ColumnId>,
    pub title: String,
}

impl ColumnSpec {
    /// A new column with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
        }
    }

    /// Refer to an existing column
    pub fn existing(id: impl Into<ColumnId>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
        }
    }

    /// Title as it will be stored
    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }
}

impl From<&str> for ColumnSpec {
    fn from(title: &str) -> Self {
        Self::new(title)
    }
}

impl From<&Column> for ColumnSpec {
    fn from(column: &Column) -> Self {
        Self::existing(column.id.clone(), column.title.clone())
    }
}

/// Column titles are stored trimmed and case-folded
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_creation() {
        let board = Board::new("Roadmap", UserId::from("u1"), "Unassigned");
        assert_eq!(board.name, "Roadmap");
        assert!(board.columns.is_empty());
        assert_eq!(board.fallback_column.title, "unassigned");
        assert!(!board.has_fallback_column());
    }

    #[test]
    fn test_column_lookup() {
        let todo = Column::new("  To Do ");
        let done = Column::new("Done");
        let board = Board::new("Roadmap", UserId::from("u1"), "unassigned")
            .with_columns(vec![todo.clone(), done.clone()]);

        assert_eq!(todo.title, "to do");
        assert_eq!(board.column_index(&done.id), Some(1));
        assert!(board.has_column(&todo.id));
        assert!(!board.has_column(&ColumnId::from("missing")));
    }

    #[test]
    fn test_column_spec_deserializes_without_id() {
        let spec: ColumnSpec = serde_json::from_str(r#"{"title": "Doing"}"#).unwrap();
        assert_eq!(spec.id, None);
        assert_eq!(spec.normalized_title(), "doing");
    }

    #[test]
    fn test_board_serializes_id_field() {
        let board = Board::new("Roadmap", UserId::from("u1"), "unassigned");
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json["id"], board.id.as_str());
        assert_eq!(json["fallback_column"]["title"], "unassigned");
    }
}
