//! ConfigLoader: composes file and environment sources into `ValidatorConfig`.

use super::ValidatorConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Environment prefix; nested keys use `__`, e.g. `BLOBMIGRATE__CLUSTER__HOST`.
pub const ENV_PREFIX: &str = "BLOBMIGRATE";

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Platform config file (`~/.config/blobmigrate/config.toml` on Linux).
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "blobmigrate")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load from the global config file, if present, with environment overlay.
    pub fn load() -> Result<ValidatorConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = Self::global_config_path() {
            builder = builder.add_source(File::from(path).required(false));
        }
        Self::finish(builder)
    }

    /// Load from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<ValidatorConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).required(true));
        Self::finish(builder)
    }

    /// Load from `path` when given, otherwise from the standard locations.
    pub fn load_optional(path: Option<&Path>) -> Result<ValidatorConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<ValidatorConfig, ConfigError> {
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );
        builder.build()?.try_deserialize()
    }
}
