//! Configuration
//!
//! Settings are layered with the `config` crate: serde defaults, then an
//! optional TOML file, then `BLOBMIGRATE__*` environment variables.

pub mod loader;

pub use loader::ConfigLoader;

use crate::logging::LoggingConfig;
use crate::version::VersionWindow;
use serde::{Deserialize, Serialize};

/// Default cluster address, `host:port` of the HTTP endpoint.
pub const DEFAULT_HOST: &str = "localhost:4200";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Connection settings for cluster introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSettings {
    /// `host:port` or full URL of a node's HTTP endpoint
    #[serde(default = "default_host")]
    pub host: String,

    /// Scheme used when `host` carries none
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Basic auth user
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            scheme: default_scheme(),
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level validator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub cluster: ClusterSettings,

    /// Supported source version window
    #[serde(default)]
    pub versions: VersionWindow,

    #[serde(default)]
    pub logging: LoggingConfig,
}
