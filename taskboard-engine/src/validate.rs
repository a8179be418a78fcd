//! Input checks shared by the board, column and task operations
//!
//! All functions are pure. Length bounds come from [`EngineConfig`] and count
//! characters, not bytes.

use crate::error::{BoardError, Result};
use crate::types::{normalize_title, Column, ColumnSpec};
use std::collections::HashSet;
use taskboard_config::{EngineConfig, LengthBound};

/// Check a candidate column set.
///
/// Titles are compared after normalization, so `"Todo"` and `" todo "` clash.
/// An empty set is valid. Explicit ids must be distinct since each one marks
/// a reuse of a single existing column.
pub fn validate_column_specs(specs: &[ColumnSpec], bound: &LengthBound) -> Result<()> {
    let mut titles = HashSet::new();
    for spec in specs {
        let title = spec.normalized_title();
        if !bound.contains(&title) {
            return Err(BoardError::InvalidColumnTitleLength {
                title,
                min: bound.min,
                max: bound.max,
            });
        }
        if !titles.insert(title.clone()) {
            return Err(BoardError::DuplicateColumnTitle { title });
        }
    }

    let mut ids = HashSet::new();
    for id in specs.iter().filter_map(|s| s.id.as_ref()) {
        if !ids.insert(id) {
            return Err(BoardError::DuplicateColumnIds { id: id.to_string() });
        }
    }

    Ok(())
}

/// Check that a resolved column list has no repeated title
pub fn ensure_distinct_titles(columns: &[Column]) -> Result<()> {
    let mut titles = HashSet::new();
    for column in columns {
        if !titles.insert(normalize_title(&column.title)) {
            return Err(BoardError::DuplicateColumnTitle {
                title: column.title.clone(),
            });
        }
    }
    Ok(())
}

/// Trimmed board name
pub fn board_name(name: &str, config: &EngineConfig) -> Result<String> {
    required_text("name", name, &config.board_name)
}

/// Trimmed task title
pub fn task_title(title: &str, config: &EngineConfig) -> Result<String> {
    required_text("title", title, &config.task_title)
}

/// Trimmed subtask title
pub fn subtask_title(title: &str, config: &EngineConfig) -> Result<String> {
    required_text("subtask", title, &config.subtask_title)
}

/// Trimmed description; blank collapses to `None`
pub fn description(description: Option<&str>, config: &EngineConfig) -> Result<Option<String>> {
    let Some(text) = description.map(str::trim).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    if text.chars().count() > config.task_description_max {
        return Err(BoardError::invalid_value(
            "description",
            format!("must be at most {} characters", config.task_description_max),
        ));
    }
    Ok(Some(text.to_string()))
}

fn required_text(field: &str, value: &str, bound: &LengthBound) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BoardError::missing_field(field));
    }
    if !bound.contains(value) {
        return Err(BoardError::invalid_value(
            field,
            format!("must be {}-{} characters long", bound.min, bound.max),
        ));
    }
    Ok(value.to_string())
}
