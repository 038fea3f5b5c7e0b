//! Blocking directory replication.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::fs;
use std::path::Path;
use std::time::Instant;

use super::plan::{Action, build_plan, decide};
use super::report::CopyReport;
use super::transfer::{AtomicTransfer, Transfer};

/// Replicate `src` into `dst` with the default [`AtomicTransfer`].
///
/// # Strategy
///
/// 1. Enumerate the source tree (only the top level unless
///    `options.policy.recurse`); nothing is written if this fails
/// 2. Create the destination directories that are missing
/// 3. Decide and transfer each file in traversal order
///
/// # Errors
///
/// Returns an error if:
/// - Source does not exist ([`Error::SourceNotFound`])
/// - Source is not a directory ([`Error::NotADirectory`])
/// - A directory cannot be read or created ([`Error::ReadDir`], [`Error::CreateDir`])
/// - A file fails to copy and `continue_on_error` is off ([`Error::Transfer`])
/// - Followed symlinks form a loop ([`Error::SymlinkLoop`])
/// - The cancellation token is tripped ([`Error::Cancelled`])
///
/// Files copied before an error stay in place.
pub fn copy_dir(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyReport> {
    copy_dir_with(src, dst, options, &AtomicTransfer)
}

/// Replicate `src` into `dst`, moving bytes with a caller-supplied strategy.
///
/// # Errors
///
/// Same as [`copy_dir`].
pub fn copy_dir_with<T: Transfer + ?Sized>(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    transfer: &T,
) -> Result<CopyReport> {
    let start_time = Instant::now();
    let plan = build_plan(src, dst, options)?;
    let mut report = CopyReport::default();

    for dir in &plan.dirs {
        if options.is_cancelled() {
            return Err(report.cancelled());
        }
        if !dir.is_dir() {
            fs::create_dir_all(dir).map_err(|source| Error::CreateDir {
                path: dir.clone(),
                source,
            })?;
            report.dirs_created += 1;
        }
    }

    for entry in &plan.files {
        if options.is_cancelled() {
            return Err(report.cancelled());
        }

        let result = match decide(fs::symlink_metadata(&entry.dst), options.policy) {
            Ok(Action::Skip) => Ok(None),
            Ok(Action::Transfer) => transfer.transfer(&entry.src, &entry.dst, options).map(Some),
            Err(e) => Err(e),
        };
        report.settle(entry, result, options)?;
    }

    report.duration = start_time.elapsed();
    Ok(report)
}
