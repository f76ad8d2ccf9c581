//! Node-lock extraction and post-migration blob path derivation.
//!
//! Shard data paths carry the node-lock id as `.../nodes/<N>/indices/...`.
//! The new blob layout inserts the same `nodes/<N>` pair in front of the
//! blob path's `indices` segment.

use super::{INDICES_SEGMENT, NODES_SEGMENT};
use crate::error::MigrationError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Node-lock id distinguishing node instances sharing a data root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeLock(pub u64);

impl fmt::Display for NodeLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normal segments of a path as strings; non UTF-8 segments become `None`.
fn segments(path: &Path) -> Vec<Option<&str>> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_str()),
            _ => None,
        })
        .collect()
}

fn parse_lock(segment: Option<&str>) -> Option<NodeLock> {
    let segment = segment?;
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok().map(NodeLock)
}

/// Extract the node-lock id from a shard data path.
///
/// Exactly one `nodes/<digits>/indices` run must be present. Nested layouts
/// with several runs are rejected rather than resolved.
pub fn extract_node_lock(data_path: &Path) -> Result<NodeLock, MigrationError> {
    let segs = segments(data_path);
    let locks: Vec<NodeLock> = segs
        .windows(3)
        .filter(|w| w[0] == Some(NODES_SEGMENT) && w[2] == Some(INDICES_SEGMENT))
        .filter_map(|w| parse_lock(w[1]))
        .collect();

    match locks.as_slice() {
        [] => Err(MigrationError::MissingNodeLock {
            path: data_path.to_path_buf(),
        }),
        [lock] => Ok(*lock),
        many => Err(MigrationError::AmbiguousNodeLock {
            path: data_path.to_path_buf(),
            occurrences: many.len(),
        }),
    }
}

/// Position of the `indices` segment of a blob path within its components.
///
/// Prefers the last `indices` followed by an index name and a numeric shard
/// id, so an index literally named `indices` does not confuse the split.
fn indices_position(components: &[Component<'_>]) -> Option<usize> {
    let is_indices = |c: &Component<'_>| matches!(c, Component::Normal(n) if *n == INDICES_SEGMENT);
    let is_shard = |c: Option<&Component<'_>>| match c {
        Some(Component::Normal(n)) => parse_lock(n.to_str()).is_some(),
        _ => false,
    };

    let structural = (0..components.len()).rev().find(|&i| {
        is_indices(&components[i])
            && components.get(i + 1).is_some()
            && is_shard(components.get(i + 2))
    });
    structural.or_else(|| components.iter().rposition(is_indices))
}

/// Compute where a blob shard directory lives in the node-scoped layout.
///
/// `/t/b/indices/t1/1/blobs` with data path `/t/d/c/nodes/0/indices/t1/1`
/// becomes `/t/b/nodes/0/indices/t1/1/blobs`. A blob path that already has
/// the matching `nodes/<N>` in place is returned unchanged.
pub fn derive_target_path(data_path: &Path, blob_path: &Path) -> Result<PathBuf, MigrationError> {
    let lock = extract_node_lock(data_path)?;
    let components: Vec<Component<'_>> = blob_path.components().collect();
    let at = indices_position(&components).ok_or_else(|| MigrationError::MissingIndicesSegment {
        path: blob_path.to_path_buf(),
    })?;

    if at >= 2 {
        let already_scoped = matches!(components[at - 2], Component::Normal(n) if n == NODES_SEGMENT)
            && match components[at - 1] {
                Component::Normal(n) => parse_lock(n.to_str()) == Some(lock),
                _ => false,
            };
        if already_scoped {
            return Ok(blob_path.to_path_buf());
        }
    }

    let mut target: PathBuf = components[..at].iter().collect();
    target.push(NODES_SEGMENT);
    target.push(lock.to_string());
    target.extend(&components[at..]);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_node_lock() {
        let lock = extract_node_lock(Path::new("/t/d/c/nodes/0/indices/t1/1")).unwrap();
        assert_eq!(lock, NodeLock(0));
        let lock = extract_node_lock(Path::new("/data/nodes/12/indices/.blob_b/3")).unwrap();
        assert_eq!(lock, NodeLock(12));
    }

    #[test]
    fn test_extract_requires_numeric_lock() {
        let err = extract_node_lock(Path::new("/data/nodes/x1/indices/t1/1")).unwrap_err();
        assert!(matches!(err, MigrationError::MissingNodeLock { .. }));
    }

    #[test]
    fn test_extract_requires_whole_segments() {
        let err = extract_node_lock(Path::new("/data/mynodes/0/indices/t1/1")).unwrap_err();
        assert!(matches!(err, MigrationError::MissingNodeLock { .. }));
        let err = extract_node_lock(Path::new("/data/nodes/0/indices2/t1/1")).unwrap_err();
        assert!(matches!(err, MigrationError::MissingNodeLock { .. }));
    }

    #[test]
    fn test_extract_rejects_pre_lock_layout() {
        let err = extract_node_lock(Path::new("/data/indices/t1/1")).unwrap_err();
        match err {
            MigrationError::MissingNodeLock { path } => {
                assert_eq!(path, PathBuf::from("/data/indices/t1/1"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_rejects_nested_locks() {
        let err =
            extract_node_lock(Path::new("/mnt/nodes/0/indices/x/nodes/1/indices/t1/1")).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::AmbiguousNodeLock { occurrences: 2, .. }
        ));
    }

    #[test]
    fn test_derive_target_path() {
        let target = derive_target_path(
            Path::new("/t/d/c/nodes/0/indices/t1/1"),
            Path::new("/t/b/indices/t1/1/blobs"),
        )
        .unwrap();
        assert_eq!(target, PathBuf::from("/t/b/nodes/0/indices/t1/1/blobs"));
    }

    #[test]
    fn test_derive_target_path_for_blob_table_index() {
        let target = derive_target_path(
            Path::new("/t/d/c/nodes/3/indices/.blob_t1/1"),
            Path::new("/t/b/indices/.blob_t1/1/blobs"),
        )
        .unwrap();
        assert_eq!(target, PathBuf::from("/t/b/nodes/3/indices/.blob_t1/1/blobs"));
    }

    #[test]
    fn test_derive_target_path_with_index_named_indices() {
        let target = derive_target_path(
            Path::new("/d/nodes/0/indices/indices/1"),
            Path::new("/b/indices/indices/1/blobs"),
        )
        .unwrap();
        assert_eq!(target, PathBuf::from("/b/nodes/0/indices/indices/1/blobs"));
    }

    #[test]
    fn test_derive_target_path_missing_lock() {
        let err = derive_target_path(
            Path::new("/t/d/c/indices/t1/1"),
            Path::new("/t/b/indices/t1/1/blobs"),
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::MissingNodeLock { .. }));
    }

    #[test]
    fn test_derive_target_path_missing_indices() {
        let err = derive_target_path(
            Path::new("/t/d/c/nodes/0/indices/t1/1"),
            Path::new("/t/b/blobs"),
        )
        .unwrap_err();
        assert!(matches!(err, MigrationError::MissingIndicesSegment { .. }));
    }

    #[test]
    fn test_derive_target_path_is_idempotent() {
        let data = Path::new("/t/d/c/nodes/0/indices/t1/1");
        let once = derive_target_path(data, Path::new("/t/b/indices/t1/1/blobs")).unwrap();
        let twice = derive_target_path(data, &once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_derive_target_path_other_lock_is_not_treated_as_migrated() {
        let target = derive_target_path(
            Path::new("/d/nodes/1/indices/t1/1"),
            Path::new("/b/nodes/0/indices/t1/1/blobs"),
        )
        .unwrap();
        assert_eq!(target, PathBuf::from("/b/nodes/0/nodes/1/indices/t1/1/blobs"));
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-z_.][a-z0-9_]{0,7}".prop_filter("reserved", |s| {
            s != "." && s != ".." && s != NODES_SEGMENT && s != INDICES_SEGMENT
        })
    }

    proptest! {
        #[test]
        fn prop_target_inserts_lock_before_indices(
            data_prefix in prop::collection::vec(segment(), 0..4),
            blob_prefix in prop::collection::vec(segment(), 0..4),
            lock in 0u64..10_000,
            index in segment(),
            shard in 0u32..64,
        ) {
            let mut data = PathBuf::from("/");
            data.extend(&data_prefix);
            data.push(NODES_SEGMENT);
            data.push(lock.to_string());
            data.push(INDICES_SEGMENT);
            data.push(&index);
            data.push(shard.to_string());

            let mut blob_root = PathBuf::from("/");
            blob_root.extend(&blob_prefix);
            let mut blob = blob_root.clone();
            blob.push(INDICES_SEGMENT);
            blob.push(&index);
            blob.push(shard.to_string());
            blob.push("blobs");

            let target = derive_target_path(&data, &blob).unwrap();

            let mut expected = blob_root;
            expected.push(NODES_SEGMENT);
            expected.push(lock.to_string());
            expected.push(INDICES_SEGMENT);
            expected.push(&index);
            expected.push(shard.to_string());
            expected.push("blobs");
            prop_assert_eq!(&target, &expected);

            let again = derive_target_path(&data, &target).unwrap();
            prop_assert_eq!(again, target);
        }

        #[test]
        fn prop_data_path_without_lock_fails(
            prefix in prop::collection::vec(segment(), 0..6),
        ) {
            let mut data = PathBuf::from("/");
            data.extend(&prefix);
            data.push(INDICES_SEGMENT);
            data.push("t1");
            data.push("0");
            let result = derive_target_path(&data, Path::new("/b/indices/t1/0/blobs"));
            let is_missing_lock = matches!(result, Err(MigrationError::MissingNodeLock { .. }));
            prop_assert!(is_missing_lock);
        }
    }
}
