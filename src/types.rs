//! Core types for the blob layout validator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Hostname of a cluster node, as reported by introspection.
pub type NodeName = String;

/// Paths of one blob shard: its primary data path and its blob path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardPathRecord {
    pub node: NodeName,
    pub data_path: PathBuf,
    pub blob_path: PathBuf,
}

impl ShardPathRecord {
    pub fn new(
        node: impl Into<NodeName>,
        data_path: impl Into<PathBuf>,
        blob_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            node: node.into(),
            data_path: data_path.into(),
            blob_path: blob_path.into(),
        }
    }
}

/// Configured data roots of one cluster node, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFsLayout {
    pub node: NodeName,
    pub data_roots: Vec<PathBuf>,
}

impl NodeFsLayout {
    pub fn has_multiple_roots(&self) -> bool {
        self.data_roots.len() > 1
    }
}

/// A move an operator has to run on `node` before upgrading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationCommand {
    pub node: NodeName,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl RelocationCommand {
    pub fn new(
        node: impl Into<NodeName>,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            node: node.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Prose form, e.g. `move /a/blobs to /b`.
    pub fn describe(&self) -> String {
        format!(
            "move {} to {}",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// Renders the shell command to run on the node.
impl fmt::Display for RelocationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mv \"{}\" \"{}\"",
            self.source.display(),
            self.destination.display()
        )
    }
}
