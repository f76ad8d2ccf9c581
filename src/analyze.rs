//! Analyzers deciding whether blob shards must be relocated.
//!
//! Each analyzer is a pure function over the shard path rows returned by
//! cluster introspection. They are run independently; neither knows about
//! the other.

pub mod custom_blob_path;
pub mod multi_data_path;

pub use custom_blob_path::has_custom_blob_path;
pub use multi_data_path::{check_multiple_data_paths, has_multiple_data_roots, has_path_diff};

use serde::Serialize;
use std::fmt;

/// Which analyzer produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    MultipleDataPaths,
    CustomBlobPath,
}

impl Check {
    /// Warning headline printed above the grouped commands.
    pub fn headline(&self) -> &'static str {
        match self {
            Check::MultipleDataPaths => {
                "WARNING: Multiple path.data paths have been found. Migration is required!"
            }
            Check::CustomBlobPath => "WARNING: A custom blob path set. Migration is required!",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::MultipleDataPaths => write!(f, "multiple-data-paths"),
            Check::CustomBlobPath => write!(f, "custom-blob-path"),
        }
    }
}
