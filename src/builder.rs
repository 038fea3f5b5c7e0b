//! Builder API for ergonomic replication.
//!
//! The builder pattern provides a fluent interface for configuring and executing
//! a replication. This is often more convenient than manually constructing
//! [`CopyOptions`].
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use fsclient::CopyBuilder;
//!
//! // Top-level files only, existing files replaced
//! let report = CopyBuilder::new("src", "dst").run()?;
//! println!("Copied {} files", report.files_copied);
//! # Ok::<(), fsclient::Error>(())
//! ```
//!
//! ## Mirror a Tree Without Touching Existing Files
//!
//! ```no_run
//! use fsclient::CopyBuilder;
//!
//! let report = CopyBuilder::new("src", "dst")
//!     .recursive()
//!     .skip_existing()
//!     .run()?;
//!
//! if report.files_skipped > 0 {
//!     println!("Left {} existing files alone", report.files_skipped);
//! }
//! # Ok::<(), fsclient::Error>(())
//! ```

use crate::copy::{
    CopyReport, SkeletonStats, Transfer, clone_skeleton, copy_dir, copy_dir_async, copy_dir_with,
};
use crate::error::Result;
use crate::options::CopyOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// A builder for configuring and executing a replication.
///
/// # Example
///
/// ```no_run
/// use fsclient::CopyBuilder;
///
/// let report = CopyBuilder::new("/data/project", "/backup/project")
///     .recursive()
///     .continue_on_error()
///     .run()?;
/// for failure in report.failures() {
///     eprintln!("{}", failure.src.display());
/// }
/// # Ok::<(), fsclient::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CopyBuilder {
    src: PathBuf,
    dst: PathBuf,
    options: CopyOptions,
}

impl CopyBuilder {
    /// Create a new `CopyBuilder` with the given source and destination paths.
    ///
    /// Uses default options (top level only, overwrite, preserve timestamps).
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> Self {
        Self {
            src: src.as_ref().to_path_buf(),
            dst: dst.as_ref().to_path_buf(),
            options: CopyOptions::default(),
        }
    }

    /// Descend into subdirectories.
    #[must_use]
    pub fn recursive(mut self) -> Self {
        self.options = self.options.recursive();
        self
    }

    /// Leave files that already exist at the destination alone.
    #[must_use]
    pub fn skip_existing(mut self) -> Self {
        self.options = self.options.without_overwrite();
        self
    }

    /// Replace existing files at the destination (default behavior).
    #[must_use]
    pub fn overwrite(mut self) -> Self {
        self.options.policy.overwrite = true;
        self
    }

    /// Record failed files in the report instead of aborting.
    #[must_use]
    pub fn continue_on_error(mut self) -> Self {
        self.options = self.options.continue_on_error();
        self
    }

    /// Disable fsync for faster but less durable copies.
    #[must_use]
    pub fn no_fsync(mut self) -> Self {
        self.options = self.options.without_fsync();
        self
    }

    /// Don't preserve file timestamps.
    #[must_use]
    pub fn no_timestamps(mut self) -> Self {
        self.options = self.options.without_timestamps();
        self
    }

    /// Don't preserve file permissions.
    #[must_use]
    pub fn no_permissions(mut self) -> Self {
        self.options = self.options.without_permissions();
        self
    }

    /// Set a cancellation token.
    ///
    /// Store `true` into the token from another thread (e.g. a Ctrl-C
    /// handler) to stop before the next file.
    #[must_use]
    pub fn cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.options = self.options.with_cancel_token(token);
        self
    }

    /// Set a custom warning handler.
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_warn_handler(handler);
        self
    }

    /// Set a handler that receives one line per copied, skipped or failed file.
    #[must_use]
    pub fn verbose(mut self, handler: fn(&str)) -> Self {
        self.options = self.options.with_verbose_handler(handler);
        self
    }

    /// Get a reference to the current options.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Execute the replication with the default blocking transfer.
    ///
    /// # Errors
    ///
    /// See [`copy_dir`].
    pub fn run(self) -> Result<CopyReport> {
        copy_dir(&self.src, &self.dst, &self.options)
    }

    /// Execute the replication with a custom transfer strategy.
    ///
    /// # Errors
    ///
    /// See [`copy_dir`].
    pub fn run_with<T: Transfer + ?Sized>(self, transfer: &T) -> Result<CopyReport> {
        copy_dir_with(&self.src, &self.dst, &self.options, transfer)
    }

    /// Execute the replication without blocking the calling task.
    ///
    /// # Errors
    ///
    /// See [`copy_dir`].
    pub async fn run_async(self) -> Result<CopyReport> {
        copy_dir_async(&self.src, &self.dst, &self.options).await
    }

    /// Recreate only the directory structure of the source.
    ///
    /// Copy options are irrelevant here and ignored.
    ///
    /// # Errors
    ///
    /// See [`clone_skeleton`].
    pub fn run_skeleton(self) -> Result<SkeletonStats> {
        clone_skeleton(&self.src, &self.dst)
    }
}
