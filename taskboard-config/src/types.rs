//! Strongly typed engine configuration

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Hard ceiling for column titles regardless of deployment settings
pub const COLUMN_TITLE_CEILING: usize = 50;

/// Inclusive character-count bound for a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBound {
    pub min: usize,
    pub max: usize,
}

impl LengthBound {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Check a value's length in characters (not bytes)
    pub fn contains(&self, value: &str) -> bool {
        self.range().contains(&value.chars().count())
    }

    pub fn range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    fn validate(&self, key: &str) -> ConfigResult<()> {
        if self.min > self.max {
            return Err(ConfigError::validation(format!(
                "{key}.min ({}) exceeds {key}.max ({})",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// When the fallback ("unassigned") column joins a board's column list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Only once tasks would otherwise be orphaned by a column removal
    #[default]
    Lazy,
    /// From board creation on, and never removed by reconciliation
    Eager,
}

/// Fallback column settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub policy: FallbackPolicy,
    pub title: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            policy: FallbackPolicy::Lazy,
            title: "unassigned".to_string(),
        }
    }
}

/// File-backed repository settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".taskboard"),
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub column_title: LengthBound,
    pub board_name: LengthBound,
    pub task_title: LengthBound,
    pub task_description_max: usize,
    pub subtask_title: LengthBound,
    pub fallback: FallbackConfig,
    pub storage: StorageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            column_title: LengthBound::new(2, 20),
            board_name: LengthBound::new(3, 50),
            task_title: LengthBound::new(2, 150),
            task_description_max: 500,
            subtask_title: LengthBound::new(2, 50),
            fallback: FallbackConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the fallback policy
    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback.policy = policy;
        self
    }

    /// Set the column title bound
    pub fn with_column_title(mut self, min: usize, max: usize) -> Self {
        self.column_title = LengthBound::new(min, max);
        self
    }

    /// Set the storage root
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage.root = root.into();
        self
    }

    /// Normalized fallback column title (trimmed, lowercase)
    pub fn fallback_title(&self) -> String {
        self.fallback.title.trim().to_lowercase()
    }

    /// Check the configuration can be used by the engine
    pub fn validate(&self) -> ConfigResult<()> {
        self.column_title.validate("column_title")?;
        self.board_name.validate("board_name")?;
        self.task_title.validate("task_title")?;
        self.subtask_title.validate("subtask_title")?;

        if self.column_title.max > COLUMN_TITLE_CEILING {
            return Err(ConfigError::validation(format!(
                "column_title.max ({}) exceeds the ceiling of {COLUMN_TITLE_CEILING}",
                self.column_title.max
            )));
        }

        let fallback = self.fallback_title();
        if fallback.is_empty() {
            return Err(ConfigError::validation("fallback.title must not be empty"));
        }
        if !self.column_title.contains(&fallback) {
            return Err(ConfigError::validation(format!(
                "fallback.title '{fallback}' must be {}-{} characters long",
                self.column_title.min, self.column_title.max
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.column_title, LengthBound::new(2, 20));
        assert_eq!(config.fallback.policy, FallbackPolicy::Lazy);
        assert_eq!(config.fallback_title(), "unassigned");
    }

    #[test]
    fn test_length_bound_counts_chars() {
        let bound = LengthBound::new(2, 3);
        assert!(bound.contains("äöü"));
        assert!(!bound.contains("a"));
        assert!(!bound.contains("abcd"));
    }

    #[test]
    fn test_inverted_bound_rejected() {
        let config = EngineConfig::default().with_column_title(10, 5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_column_title_ceiling() {
        assert!(EngineConfig::default().with_column_title(2, 50).validate().is_ok());
        assert!(EngineConfig::default().with_column_title(2, 51).validate().is_err());
    }

    #[test]
    fn test_fallback_title_must_fit_column_bound() {
        let mut config = EngineConfig::default();
        config.fallback.title = "x".into();
        assert!(config.validate().is_err());

        config.fallback.title = "   ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_serializes_lowercase() {
        use figment::{providers::Serialized, Figment};

        let config = EngineConfig::default().with_fallback_policy(FallbackPolicy::Eager);
        let policy: String = Figment::from(Serialized::defaults(config))
            .extract_inner("fallback.policy")
            .unwrap();
        assert_eq!(policy, "eager");
    }
}
