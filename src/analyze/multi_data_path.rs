//! Multi data root detection.
//!
//! With several `path.data` roots, each root must carry the blob data of the
//! shards whose state lives in it. A blob directory sitting in another root
//! has to move next to its shard data.

use crate::paths::is_descendant;
use crate::report::{Analysis, MigrationReport};
use crate::types::{NodeFsLayout, RelocationCommand, ShardPathRecord};

/// True if any node is configured with more than one data root.
pub fn has_multiple_data_roots(layouts: &[NodeFsLayout]) -> bool {
    layouts.iter().any(NodeFsLayout::has_multiple_roots)
}

/// Check every shard for a blob path outside its data path.
///
/// The corrective move targets the data path itself; no node-lock splicing
/// happens here.
pub fn has_path_diff(rows: &[ShardPathRecord]) -> Analysis {
    let mut report = MigrationReport::new();
    for row in rows {
        let commands = report.visit(&row.node);
        if !is_descendant(&row.blob_path, &row.data_path) {
            commands.push(RelocationCommand::new(
                row.node.clone(),
                row.blob_path.clone(),
                row.data_path.clone(),
            ));
        }
    }
    Analysis::from_report(report)
}

/// Run the path check only when some node has several data roots.
pub fn check_multiple_data_paths(layouts: &[NodeFsLayout], rows: &[ShardPathRecord]) -> Analysis {
    if !has_multiple_data_roots(layouts) {
        return Analysis::compliant(MigrationReport::new());
    }
    has_path_diff(rows)
}
