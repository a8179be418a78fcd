//! Configuration provider using Figment

use crate::{
    discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery},
    error::{ConfigError, ConfigResult},
    types::EngineConfig,
};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use std::path::PathBuf;
use tracing::{debug, info, trace};

/// Environment variable prefix; `__` separates nested keys
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Loads [`EngineConfig`] from all sources.
///
/// Sources, later overriding earlier:
/// 1. Built-in defaults
/// 2. Discovered files (global, then project)
/// 3. An explicit file, if one was given
/// 4. `TASKBOARD_*` environment variables
///
/// Nothing is cached; every call to [`load`](Self::load) reads fresh.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    discovery: FileDiscovery,
    explicit: Option<PathBuf>,
}

impl ConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific discovery configuration
    pub fn with_discovery(mut self, discovery: FileDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// Merge an explicit file above discovered ones
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    /// Load and validate the configuration
    pub fn load(&self) -> ConfigResult<EngineConfig> {
        let config: EngineConfig = self.build_figment()?.extract()?;
        config.validate()?;

        info!(
            fallback_policy = ?config.fallback.policy,
            column_title_max = config.column_title.max,
            "Loaded engine configuration"
        );
        Ok(config)
    }

    fn build_figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(EngineConfig::default()));

        for file in self.discovery.discover_all() {
            figment = figment.merge(Self::file_provider(&file));
        }

        if let Some(path) = &self.explicit {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound { path: path.clone() });
            }
            let file = ConfigFile {
                path: path.clone(),
                format: ConfigFormat::from_path(path)?,
                scope: ConfigScope::Explicit,
            };
            figment = figment.merge(Self::file_provider(&file));
        }

        debug!("Merging {ENV_PREFIX}* environment variables");
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn file_provider(file: &ConfigFile) -> Figment {
        trace!("Loading config file: {} ({:?})", file.path.display(), file.format);
        match file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(&file.path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(&file.path)),
            ConfigFormat::Json => Figment::from(Json::file(&file.path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FallbackPolicy;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn isolated(dir: &TempDir) -> ConfigProvider {
        ConfigProvider::new().with_discovery(
            FileDiscovery::new()
                .with_global_dir(dir.path().join("global"))
                .with_project_dir(dir.path().join("project")),
        )
    }

    #[test]
    #[serial]
    fn test_defaults_without_sources() {
        let temp = TempDir::new().unwrap();
        let config = isolated(&temp).load().unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    #[serial]
    fn test_project_file_overrides_global_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("global")).unwrap();
        fs::create_dir_all(temp.path().join("project")).unwrap();
        fs::write(
            temp.path().join("global/taskboard.toml"),
            "[column_title]\nmin = 2\nmax = 30\n\n[fallback]\npolicy = \"eager\"\ntitle = \"inbox\"\n",
        )
        .unwrap();
        fs::write(
            temp.path().join("project/taskboard.yaml"),
            "column_title:\n  min: 2\n  max: 40\n",
        )
        .unwrap();

        let config = isolated(&temp).load().unwrap();
        assert_eq!(config.column_title.max, 40);
        assert_eq!(config.fallback.policy, FallbackPolicy::Eager);
        assert_eq!(config.fallback.title, "inbox");
        assert_eq!(config.board_name.max, 50);
    }

    #[test]
    #[serial]
    fn test_env_overrides_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("engine.json");
        fs::write(&file, r#"{"task_description_max": 200}"#).unwrap();

        std::env::set_var("TASKBOARD_TASK_DESCRIPTION_MAX", "300");
        std::env::set_var("TASKBOARD_COLUMN_TITLE__MAX", "50");
        let result = isolated(&temp).with_file(&file).load();
        std::env::remove_var("TASKBOARD_TASK_DESCRIPTION_MAX");
        std::env::remove_var("TASKBOARD_COLUMN_TITLE__MAX");

        let config = result.unwrap();
        assert_eq!(config.task_description_max, 300);
        assert_eq!(config.column_title.max, 50);
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        let result = isolated(&temp)
            .with_file(temp.path().join("missing.toml"))
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    #[serial]
    fn test_invalid_values_fail_validation() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("engine.toml");
        fs::write(&file, "[column_title]\nmin = 2\nmax = 80\n").unwrap();

        let result = isolated(&temp).with_file(&file).load();
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    #[serial]
    fn test_malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("engine.toml");
        fs::write(&file, "column_title = \"wide\"\n").unwrap();

        let result = isolated(&temp).with_file(&file).load();
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
