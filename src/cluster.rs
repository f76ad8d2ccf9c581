//! Cluster introspection.
//!
//! The validator only ever reads four things from a cluster. `ClusterCatalog`
//! is the port for those reads; `HttpCatalog` talks to a live node and
//! `StaticCatalog` serves fixed rows.

pub mod http;
pub mod queries;

pub use http::HttpCatalog;

use crate::error::MigrationError;
use crate::types::{NodeFsLayout, ShardPathRecord};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read-only catalog queries issued against one cluster connection.
pub trait ClusterCatalog {
    /// Raw version string of every node.
    fn node_versions(&self) -> Result<Vec<String>, MigrationError>;

    /// Number of tables in the blob schema.
    fn blob_table_count(&self) -> Result<u64, MigrationError>;

    /// Configured data roots per node.
    fn node_data_roots(&self) -> Result<Vec<NodeFsLayout>, MigrationError>;

    /// `(node, data path, blob path)` of every blob shard with a path,
    /// ordered by node then data path.
    fn blob_shard_paths(&self) -> Result<Vec<ShardPathRecord>, MigrationError>;

    /// Human readable target, used in log and console output.
    fn describe(&self) -> String;
}

/// Catalog answering from fixed rows.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    pub versions: Vec<String>,
    pub blob_tables: u64,
    pub layouts: Vec<NodeFsLayout>,
    pub shards: Vec<ShardPathRecord>,
    queries: AtomicUsize,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions<S: Into<String>>(mut self, versions: impl IntoIterator<Item = S>) -> Self {
        self.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_blob_tables(mut self, count: u64) -> Self {
        self.blob_tables = count;
        self
    }

    pub fn with_layouts(mut self, layouts: Vec<NodeFsLayout>) -> Self {
        self.layouts = layouts;
        self
    }

    pub fn with_shards(mut self, shards: Vec<ShardPathRecord>) -> Self {
        self.shards = shards;
        self
    }

    /// Number of catalog reads served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::SeqCst);
    }
}

impl ClusterCatalog for StaticCatalog {
    fn node_versions(&self) -> Result<Vec<String>, MigrationError> {
        self.record_query();
        Ok(self.versions.clone())
    }

    fn blob_table_count(&self) -> Result<u64, MigrationError> {
        self.record_query();
        Ok(self.blob_tables)
    }

    fn node_data_roots(&self) -> Result<Vec<NodeFsLayout>, MigrationError> {
        self.record_query();
        Ok(self.layouts.clone())
    }

    fn blob_shard_paths(&self) -> Result<Vec<ShardPathRecord>, MigrationError> {
        self.record_query();
        let mut shards = self.shards.clone();
        shards.sort_by(|a, b| (&a.node, &a.data_path).cmp(&(&b.node, &b.data_path)));
        Ok(shards)
    }

    fn describe(&self) -> String {
        "static catalog".to_string()
    }
}
