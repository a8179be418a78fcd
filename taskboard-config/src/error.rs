//! Error types for the taskboard configuration system

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// Configuration parsed but holds values the engine cannot run with
    #[error("Configuration validation failed: {message}")]
    Validation { message: String },

    /// Configuration file format not supported
    #[error("Unsupported configuration file format: {format}")]
    UnsupportedFormat { format: String },
}

impl ConfigError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = ConfigError::validation("column_title.min exceeds column_title.max");
        assert_eq!(
            err.to_string(),
            "Configuration validation failed: column_title.min exceeds column_title.max"
        );
    }

    #[test]
    fn test_file_not_found_display() {
        let err = ConfigError::FileNotFound {
            path: PathBuf::from("/nope/taskboard.toml"),
        };
        assert!(err.to_string().contains("/nope/taskboard.toml"));
    }
}
