//! Configuration file discovery
//!
//! Looks for `taskboard.{toml,yaml,yml,json}` inside a global (`~/.taskboard/`)
//! and a project (`./.taskboard/`) directory. Project files override global ones.

use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directory name searched in the home and working directories
pub const CONFIG_DIR_NAME: &str = ".taskboard";

/// File stem of configuration files
pub const CONFIG_FILE_STEM: &str = "taskboard";

const EXTENSIONS: [&str; 4] = ["toml", "yaml", "yml", "json"];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub scope: ConfigScope,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Detect format from a path
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| ConfigError::UnsupportedFormat {
            format: ext.to_string(),
        })
    }
}

/// Where a configuration file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    /// `~/.taskboard/`
    Global,
    /// `./.taskboard/`
    Project,
    /// Passed in by the caller
    Explicit,
}

/// File discovery service
#[derive(Debug, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Resolve directories from the environment at discovery time
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the project directory
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    /// Override the global directory
    pub fn with_global_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_dir = Some(dir.into());
        self
    }

    /// Discover all configuration files, lowest precedence first
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let project_dir = self.project_dir.clone().or_else(Self::resolve_project_dir);
        let global_dir = self.global_dir.clone().or_else(Self::resolve_global_dir);

        let mut files = Vec::new();
        if let Some(dir) = global_dir {
            files.extend(Self::search_directory(&dir, ConfigScope::Global));
        }
        if let Some(dir) = project_dir {
            files.extend(Self::search_directory(&dir, ConfigScope::Project));
        }
        files.sort_by_key(|f| f.scope);

        debug!("Discovered {} configuration files", files.len());
        files
    }

    fn search_directory(dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
        EXTENSIONS
            .iter()
            .filter_map(|ext| {
                let path = dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
                if !path.is_file() {
                    return None;
                }
                trace!("Found config: {}", path.display());
                ConfigFormat::from_extension(ext).map(|format| ConfigFile {
                    path,
                    format,
                    scope,
                })
            })
            .collect()
    }

    fn resolve_project_dir() -> Option<PathBuf> {
        std::env::current_dir()
            .ok()
            .map(|cwd| cwd.join(CONFIG_DIR_NAME))
            .filter(|dir| dir.is_dir())
    }

    fn resolve_global_dir() -> Option<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME))
            .filter(|dir| dir.is_dir())
    }
}
