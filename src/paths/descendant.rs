//! Descendant test between a shard path and its reference path.

use std::path::Path;

/// True if `candidate` equals `base` or lies anywhere below it.
///
/// Containment is decided on whole segments, so `/a/bb` is not below `/a/b`.
pub fn is_descendant(candidate: &Path, base: &Path) -> bool {
    candidate.starts_with(base)
}
