//! Taskboard engine configuration using Figment
//!
//! Configuration is layered: built-in defaults, then `taskboard.{toml,yaml,yml,json}`
//! files found in `~/.taskboard/` and `./.taskboard/`, then an optional explicit
//! file, then `TASKBOARD_*` environment variables (`__` separates nested keys).
//!
//! ```no_run
//! use taskboard_config::load_config;
//!
//! let config = load_config()?;
//! println!("column titles: {:?}", config.column_title.range());
//! # Ok::<(), taskboard_config::ConfigError>(())
//! ```
//!
//! ## Example TOML Configuration
//!
//! ```toml
//! task_description_max = 500
//!
//! [column_title]
//! min = 2
//! max = 50
//!
//! [fallback]
//! policy = "eager"
//! title = "unassigned"
//! ```

mod discovery;
mod error;
mod provider;
mod types;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery, CONFIG_DIR_NAME};
pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, ENV_PREFIX};
pub use types::{
    EngineConfig, FallbackConfig, FallbackPolicy, LengthBound, StorageConfig,
    COLUMN_TITLE_CEILING,
};

/// Load configuration from all discovered sources
pub fn load_config() -> ConfigResult<EngineConfig> {
    ConfigProvider::new().load()
}
