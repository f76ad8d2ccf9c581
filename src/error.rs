//! Error types for the blob layout validator.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which end of the supported version window a node fell outside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBound {
    /// The node runs a version older than the minimum supported source version.
    BelowMinimum,
    /// The node already runs the target line (or newer).
    AtOrAboveNext,
}

impl fmt::Display for VersionBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBound::BelowMinimum => write!(f, "below minimum"),
            VersionBound::AtOrAboveNext => write!(f, "at or above next"),
        }
    }
}

/// Errors that abort a validation run.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Malformed version string: {raw:?} (expected major.minor.hotfix)")]
    MalformedVersion { raw: String },

    #[error("Node version {version} is {bound} of the supported window {window}")]
    VersionOutOfWindow {
        bound: VersionBound,
        version: String,
        window: String,
    },

    #[error("Invalid path: {} doesn't contain /nodes/<n>/indices/", path.display())]
    MissingNodeLock { path: PathBuf },

    #[error(
        "Unsupported layout: {} contains {occurrences} /nodes/<n>/indices/ segments",
        path.display()
    )]
    AmbiguousNodeLock { path: PathBuf, occurrences: usize },

    #[error("Invalid blob path: {} doesn't contain an indices segment", path.display())]
    MissingIndicesSegment { path: PathBuf },

    #[error("Introspection failed: {0}")]
    Introspection(String),

    #[error("Unexpected row from `{query}`: {detail}")]
    UnexpectedRow { query: String, detail: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

impl MigrationError {
    /// True for failures of the cluster version precondition.
    pub fn is_fatal_precondition(&self) -> bool {
        matches!(
            self,
            MigrationError::MalformedVersion { .. } | MigrationError::VersionOutOfWindow { .. }
        )
    }
}

impl From<config::ConfigError> for MigrationError {
    fn from(err: config::ConfigError) -> Self {
        MigrationError::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_node_lock_names_path() {
        let err = MigrationError::MissingNodeLock {
            path: PathBuf::from("/data/indices/t1/0"),
        };
        assert!(err.to_string().contains("/data/indices/t1/0"));
        assert!(!err.is_fatal_precondition());
    }

    #[test]
    fn test_version_errors_are_preconditions() {
        let err = MigrationError::VersionOutOfWindow {
            bound: VersionBound::BelowMinimum,
            version: "0.56.9".to_string(),
            window: "[0.57.3, 0.58.0)".to_string(),
        };
        assert!(err.is_fatal_precondition());
        assert!(err.to_string().contains("below minimum"));

        let err = MigrationError::MalformedVersion {
            raw: "1.x".to_string(),
        };
        assert!(err.is_fatal_precondition());
    }

    #[test]
    fn test_render_failure_is_not_introspection() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MigrationError::from(json_err);
        assert!(matches!(err, MigrationError::Render(_)));
        assert!(err.to_string().starts_with("Failed to render report:"));
        assert!(!err.is_fatal_precondition());
    }
}
