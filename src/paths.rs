//! Path reconciliation for blob storage layouts.
//!
//! All functions here are lexical: they never touch the filesystem and compare
//! paths segment by segment.

pub mod descendant;
pub mod node_lock;

pub use descendant::is_descendant;
pub use node_lock::{derive_target_path, extract_node_lock, NodeLock};

/// Literal segment that precedes the node-lock id.
pub(crate) const NODES_SEGMENT: &str = "nodes";

/// Literal segment that starts the per-index part of a shard path.
pub(crate) const INDICES_SEGMENT: &str = "indices";
