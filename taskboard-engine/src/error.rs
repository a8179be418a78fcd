//! Error types for the taskboard engine

use crate::store::{Constraint, StoreError};
use serde::Serialize;
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Caller-facing classification of a [`BoardError`]
///
/// The transport layer maps these onto its own status codes; the engine never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced board, task, column or owner does not exist
    NotFound,
    /// Input failed a length, uniqueness or presence check
    ValidationFailed,
    /// Storage rejected the write because of a unique constraint
    ConflictFailed,
    /// The request asks for a placement the topology does not allow
    InvalidTransition,
    /// The board is gone but some of its tasks could not be removed
    PartialCascadeFailure,
    /// The repository itself failed
    Infrastructure,
}

/// Errors that can occur in engine operations
#[derive(Debug, Error)]
pub enum BoardError {
    /// Board not found
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// Task not found
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Subtask not found on its task
    #[error("subtask not found: {id}")]
    SubtaskNotFound { id: String },

    /// Board owner does not resolve to a user
    #[error("board owner does not exist: {id}")]
    OwnerNotFound { id: String },

    /// Two requested columns normalize to the same title
    #[error("duplicate column title: {title}")]
    DuplicateColumnTitle { title: String },

    /// A column title is too short or too long
    #[error("column title '{title}' must be {min}-{max} characters long")]
    InvalidColumnTitleLength { title: String, min: usize, max: usize },

    /// Two requested columns carry the same explicit id
    #[error("duplicate column id: {id}")]
    DuplicateColumnIds { id: String },

    /// Missing required field
    #[error("missing required field: {field}")]
    MissingField { field: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Column is not on the task's board
    #[error("column '{column}' is not on board '{board}'")]
    InvalidColumn { board: String, column: String },

    /// Task would change boards
    #[error("task '{task}' belongs to board '{board}' and cannot be moved to another board")]
    BoardMismatch { task: String, board: String },

    /// Another board of the same owner already has this name
    #[error("a board with the name \"{name}\" already exists")]
    BoardNameConflict { name: String },

    /// Another task in the same column already has this title
    #[error("a task with the title \"{title}\" already exists in this column")]
    TaskTitleConflict { title: String },

    /// Board deleted but its tasks were not all removed
    #[error("board '{board}' was deleted but its tasks could not be removed: {source}")]
    PartialCascadeFailure {
        board: String,
        #[source]
        source: StoreError,
    },

    /// Repository failure
    #[error("storage error: {0}")]
    Store(#[source] StoreError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] taskboard_config::ConfigError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Translate a repository error, surfacing unique-constraint violations
    /// as conflicts and missing documents as not-found errors.
    pub fn from_store(error: StoreError) -> Self {
        match error {
            StoreError::Constraint {
                constraint: Constraint::UniqueBoardName,
                value,
            } => Self::BoardNameConflict { name: value },
            StoreError::Constraint {
                constraint: Constraint::UniqueTaskTitlePerColumn,
                value,
            } => Self::TaskTitleConflict { title: value },
            StoreError::BoardNotFound { id } => Self::BoardNotFound { id },
            StoreError::TaskNotFound { id } => Self::TaskNotFound { id },
            other => Self::Store(other),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BoardNotFound { .. }
            | Self::TaskNotFound { .. }
            | Self::SubtaskNotFound { .. }
            | Self::OwnerNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateColumnTitle { .. }
            | Self::InvalidColumnTitleLength { .. }
            | Self::DuplicateColumnIds { .. }
            | Self::MissingField { .. }
            | Self::InvalidValue { .. } => ErrorKind::ValidationFailed,
            Self::BoardNameConflict { .. } | Self::TaskTitleConflict { .. } => {
                ErrorKind::ConflictFailed
            }
            Self::InvalidColumn { .. } | Self::BoardMismatch { .. } => ErrorKind::InvalidTransition,
            Self::PartialCascadeFailure { .. } => ErrorKind::PartialCascadeFailure,
            Self::Store(_) | Self::Config(_) | Self::Json(_) => ErrorKind::Infrastructure,
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

impl From<StoreError> for BoardError {
    fn from(error: StoreError) -> Self {
        Self::from_store(error)
    }
}
