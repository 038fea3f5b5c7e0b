//! Directory-structure-only replication.

use crate::error::{Error, Result};
use crate::utils::path::rebase;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::plan::check_source;

/// Result of [`clone_skeleton`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkeletonStats {
    /// Number of directories that had to be created
    pub dirs_created: u64,
}

/// Recreate every directory under `src` beneath `dst`, ignoring files.
///
/// Each directory's path is taken relative to `src` and joined onto `dst`,
/// so the result mirrors the source structure even when `src`'s own name
/// reappears deeper in the tree. `dst` itself is always created. Symlinked
/// directories are not followed.
///
/// # Errors
///
/// Returns an error if:
/// - Source does not exist ([`Error::SourceNotFound`])
/// - Source is not a directory ([`Error::NotADirectory`])
/// - The walk hits an unreadable directory ([`Error::Walk`]); nothing has
///   been created at that point
/// - A directory cannot be created ([`Error::CreateDir`])
pub fn clone_skeleton(src: &Path, dst: &Path) -> Result<SkeletonStats> {
    check_source(src)?;

    // Walk to completion first: dst may live inside src.
    let mut targets = Vec::new();
    for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Some(target) = rebase(entry.path(), src, dst) {
            targets.push(target);
        }
    }

    let mut stats = SkeletonStats::default();
    for target in targets {
        if target.is_dir() {
            continue;
        }
        fs::create_dir_all(&target).map_err(|source| Error::CreateDir {
            path: target.clone(),
            source,
        })?;
        stats.dirs_created += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "cloned skeleton {} -> {} ({} dirs created)",
        src.display(),
        dst.display(),
        stats.dirs_created
    );

    Ok(stats)
}
