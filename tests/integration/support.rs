use blobmigrate::cluster::StaticCatalog;
use blobmigrate::types::{NodeFsLayout, ShardPathRecord};
use std::path::PathBuf;

pub fn layout(node: &str, roots: &[&str]) -> NodeFsLayout {
    NodeFsLayout {
        node: node.to_string(),
        data_roots: roots.iter().map(PathBuf::from).collect(),
    }
}

/// Three-node 0.57 cluster with blob tables and single data roots.
pub fn single_root_cluster(shards: Vec<ShardPathRecord>) -> StaticCatalog {
    StaticCatalog::new()
        .with_versions(["0.57.3", "0.57.6", "0.57.6"])
        .with_blob_tables(2)
        .with_layouts(vec![
            layout("crate1", &["/data"]),
            layout("crate2", &["/data"]),
            layout("crate3", &["/data"]),
        ])
        .with_shards(shards)
}
