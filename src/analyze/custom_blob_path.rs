//! Custom blob path detection.
//!
//! A blob path configured outside the shard's data path keeps the old
//! `<blobs_path>/indices/...` layout and must be moved under
//! `<blobs_path>/nodes/<N>/indices/...`.

use crate::error::MigrationError;
use crate::paths::{derive_target_path, is_descendant};
use crate::report::{Analysis, MigrationReport};
use crate::types::{RelocationCommand, ShardPathRecord};
use tracing::debug;

/// Check every shard for a blob path outside its data path.
///
/// Fails on the first non-compliant shard whose data path has no node lock,
/// since no target can be computed for it.
pub fn has_custom_blob_path(rows: &[ShardPathRecord]) -> Result<Analysis, MigrationError> {
    let mut report = MigrationReport::new();
    for row in rows {
        let commands = report.visit(&row.node);
        if is_descendant(&row.blob_path, &row.data_path) {
            continue;
        }
        let target = derive_target_path(&row.data_path, &row.blob_path)?;
        if target == row.blob_path {
            debug!(
                node = %row.node,
                blob_path = %row.blob_path.display(),
                "Blob path already uses the node-scoped layout"
            );
            continue;
        }
        commands.push(RelocationCommand::new(
            row.node.clone(),
            row.blob_path.clone(),
            target,
        ));
    }
    Ok(Analysis::from_report(report))
}
