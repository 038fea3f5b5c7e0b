//! Non-blocking directory replication on tokio.
//!
//! Traversal and conflict decisions are the ones [`copy_dir`](super::copy_dir)
//! uses; only the per-file transfer suspends. Files are still processed one at
//! a time.

use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::io;
use std::path::Path;
use std::time::Instant;

use super::plan::{Action, build_plan, decide};
use super::report::CopyReport;
use super::transfer::{AsyncTransfer, TokioTransfer};

/// Replicate `src` into `dst` without blocking the calling task, using
/// [`TokioTransfer`].
///
/// Must be called from within a tokio runtime. Dropping the returned future
/// cancels the in-flight file; its destination is left absent (or with its
/// previous content).
///
/// # Errors
///
/// Same as [`copy_dir`](super::copy_dir).
pub async fn copy_dir_async(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyReport> {
    copy_dir_async_with(src, dst, options, &TokioTransfer::default()).await
}

/// Non-blocking replication with a caller-supplied transfer strategy.
///
/// # Errors
///
/// Same as [`copy_dir`](super::copy_dir).
pub async fn copy_dir_async_with<T: AsyncTransfer>(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    transfer: &T,
) -> Result<CopyReport> {
    let start_time = Instant::now();

    let plan = {
        let (src, dst, options) = (src.to_path_buf(), dst.to_path_buf(), options.clone());
        tokio::task::spawn_blocking(move || build_plan(&src, &dst, &options))
            .await
            .map_err(|e| Error::Io(io::Error::other(e)))??
    };

    let mut report = CopyReport::default();

    for dir in &plan.dirs {
        if options.is_cancelled() {
            return Err(report.cancelled());
        }
        let exists = tokio::fs::metadata(dir)
            .await
            .is_ok_and(|meta| meta.is_dir());
        if !exists {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| Error::CreateDir {
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

        let existing = tokio::fs::symlink_metadata(&entry.dst).await;
        let result = match decide(existing, options.policy) {
            Ok(Action::Skip) => Ok(None),
            Ok(Action::Transfer) => transfer
                .transfer(&entry.src, &entry.dst, options)
                .await
                .map(Some),
            Err(e) => Err(e),
        };
        report.settle(entry, result, options)?;
    }

    report.duration = start_time.elapsed();
    Ok(report)
}
