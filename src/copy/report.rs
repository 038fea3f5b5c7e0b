//! Per-file outcomes and the report returned by the replicators.

use super::plan::FileEntry;
use crate::error::{Error, Result};
use crate::options::CopyOptions;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Bytes were transferred to the destination
    Copied {
        /// Number of bytes written
        bytes: u64,
    },
    /// Destination already existed and overwrite was disabled
    Skipped,
    /// Transfer failed; only recorded when `continue_on_error` is set
    Failed {
        /// Kind of the underlying IO error
        kind: io::ErrorKind,
        /// Message of the underlying IO error
        message: String,
    },
}

/// Outcome of one source file, with both ends of the copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Source file
    pub src: PathBuf,
    /// Destination file
    pub dst: PathBuf,
    /// What happened
    pub outcome: FileOutcome,
}

/// Result of a replicator call.
///
/// # Example
///
/// ```no_run
/// use fsclient::{copy_dir, CopyOptions};
/// use std::path::Path;
///
/// let report = copy_dir(Path::new("src"), Path::new("dst"), &CopyOptions::default())?;
/// println!("Copied {} files ({} bytes)", report.files_copied, report.bytes_copied);
/// println!("Skipped {} files", report.files_skipped);
/// # Ok::<(), fsclient::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Number of files copied
    pub files_copied: u64,
    /// Number of files left alone because they already existed
    pub files_skipped: u64,
    /// Number of files that failed (`continue_on_error` only)
    pub files_failed: u64,
    /// Number of destination directories that had to be created
    pub dirs_created: u64,
    /// Total bytes copied
    pub bytes_copied: u64,
    /// Wall-clock duration of the call
    pub duration: Duration,
    /// One record per visited source file, in traversal order
    pub records: Vec<FileRecord>,
}

impl CopyReport {
    /// Records whose transfer failed.
    pub fn failures(&self) -> impl Iterator<Item = &FileRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Failed { .. }))
    }

    /// Turn recorded failures into [`Error::PartialCopy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PartialCopy`] when at least one file failed.
    pub fn into_result(self) -> Result<Self> {
        if self.files_failed > 0 {
            return Err(Error::PartialCopy {
                failed: self.files_failed as usize,
                total: self.records.len(),
            });
        }
        Ok(self)
    }

    pub(crate) fn cancelled(&self) -> Error {
        Error::Cancelled {
            files_copied: self.files_copied,
            bytes_copied: self.bytes_copied,
            files_skipped: self.files_skipped,
            dirs_created: self.dirs_created,
        }
    }

    /// Fold one transfer result into the report.
    ///
    /// `Ok(None)` is a planned skip. A transfer that lost a creation race
    /// while overwrite is off counts as a skip too.
    pub(crate) fn settle(
        &mut self,
        entry: &FileEntry,
        result: io::Result<Option<u64>>,
        options: &CopyOptions,
    ) -> Result<()> {
        let outcome = match result {
            Ok(Some(bytes)) => FileOutcome::Copied { bytes },
            Ok(None) => FileOutcome::Skipped,
            Err(e)
                if e.kind() == io::ErrorKind::AlreadyExists && !options.policy.overwrite =>
            {
                FileOutcome::Skipped
            }
            Err(_) if options.is_cancelled() => return Err(self.cancelled()),
            Err(source) if !options.continue_on_error => {
                return Err(Error::Transfer {
                    src: entry.src.clone(),
                    dst: entry.dst.clone(),
                    source,
                });
            }
            Err(e) => {
                options.warn(&format!("Failed to copy {}: {}", entry.src.display(), e));
                FileOutcome::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                }
            }
        };

        match &outcome {
            FileOutcome::Copied { bytes } => {
                self.files_copied += 1;
                self.bytes_copied += bytes;
                options.verbose(&format!(
                    "copied {} -> {} ({} bytes)",
                    entry.src.display(),
                    entry.dst.display(),
                    bytes
                ));
            }
            FileOutcome::Skipped => {
                self.files_skipped += 1;
                options.verbose(&format!(
                    "skipped {} -> {} (already exists)",
                    entry.src.display(),
                    entry.dst.display()
                ));
            }
            FileOutcome::Failed { message, .. } => {
                self.files_failed += 1;
                options.verbose(&format!(
                    "failed {} -> {}: {}",
                    entry.src.display(),
                    entry.dst.display(),
                    message
                ));
            }
        }

        self.records.push(FileRecord {
            src: entry.src.clone(),
            dst: entry.dst.clone(),
            outcome,
        });
        Ok(())
    }
}
