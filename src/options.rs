//! Configuration options for directory replication.
//!
//! This module provides [`CopyPolicy`], the recurse/overwrite pair that every
//! replicator call threads unchanged through the whole tree, and
//! [`CopyOptions`], which adds durability, error and cancellation knobs.
//!
//! # Example
//!
//! ```
//! use fsclient::{CopyOptions, CopyPolicy};
//!
//! let options = CopyOptions::default()
//!     .with_policy(CopyPolicy::new().recurse(true).overwrite(false))
//!     .continue_on_error();
//! assert!(options.policy.recurse);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Recurse and overwrite flags for one replicator invocation.
///
/// # Default
///
/// `recurse = false`, `overwrite = true`: only the top level's files are
/// copied and existing destination files are replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CopyPolicy {
    /// Descend into subdirectories
    pub recurse: bool,
    /// Replace destination files that already exist
    pub overwrite: bool,
}

impl Default for CopyPolicy {
    fn default() -> Self {
        Self {
            recurse: false,
            overwrite: true,
        }
    }
}

impl CopyPolicy {
    /// Policy with default flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether subdirectories are mirrored.
    #[must_use]
    pub fn recurse(mut self, recurse: bool) -> Self {
        self.recurse = recurse;
        self
    }

    /// Set whether existing destination files are replaced.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Options for directory replication.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `policy` | `recurse = false`, `overwrite = true` | Tree and conflict policy |
/// | `continue_on_error` | `false` | Abort on the first failed file |
/// | `fsync` | `true` | Sync to disk before the atomic rename |
/// | `preserve_permissions` | `true` | Copy file permissions |
/// | `preserve_timestamps` | `true` | Copy file mtime/atime |
/// | `cancel_token` | `None` | No cancellation |
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(clippy::struct_excessive_bools)]
pub struct CopyOptions {
    /// Recurse and overwrite flags
    pub policy: CopyPolicy,

    /// Record failed files and keep going instead of aborting
    ///
    /// Failures show up as [`FileOutcome::Failed`](crate::FileOutcome::Failed)
    /// in the returned report.
    pub continue_on_error: bool,

    /// Whether to sync files to disk after writing (default: true)
    pub fsync: bool,

    /// Whether to preserve file permissions (default: true)
    pub preserve_permissions: bool,

    /// Whether to preserve file timestamps (default: true)
    pub preserve_timestamps: bool,

    /// Cancellation token for cooperative cancellation
    ///
    /// When set to `true`, no new file is started and in-flight non-blocking
    /// transfers stop at the next chunk boundary.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cancel_token: Option<Arc<AtomicBool>>,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub warn_handler: Option<fn(&str)>,

    /// Callback for per-file messages (optional)
    #[cfg_attr(feature = "serde", serde(skip))]
    pub verbose_handler: Option<fn(&str)>,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            policy: CopyPolicy::default(),
            continue_on_error: false,
            fsync: true,
            preserve_permissions: true,
            preserve_timestamps: true,
            cancel_token: None,
            warn_handler: None,
            verbose_handler: None,
        }
    }
}

impl CopyOptions {
    /// Replace the recurse/overwrite policy
    #[must_use]
    pub fn with_policy(mut self, policy: CopyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Mirror subdirectories
    #[must_use]
    pub fn recursive(mut self) -> Self {
        self.policy.recurse = true;
        self
    }

    /// Leave existing destination files untouched
    #[must_use]
    pub fn without_overwrite(mut self) -> Self {
        self.policy.overwrite = false;
        self
    }

    /// Record failures instead of aborting
    #[must_use]
    pub fn continue_on_error(mut self) -> Self {
        self.continue_on_error = true;
        self
    }

    /// Disable fsync for faster (but less durable) copies
    #[must_use]
    pub fn without_fsync(mut self) -> Self {
        self.fsync = false;
        self
    }

    /// Disable timestamp preservation
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.preserve_timestamps = false;
        self
    }

    /// Disable permission preservation
    #[must_use]
    pub fn without_permissions(mut self) -> Self {
        self.preserve_permissions = false;
        self
    }

    /// Set a cancellation token
    #[must_use]
    pub fn with_cancel_token(mut self, token: Arc<AtomicBool>) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Create options with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Create options with a verbose handler
    #[must_use]
    pub fn with_verbose_handler(mut self, handler: fn(&str)) -> Self {
        self.verbose_handler = Some(handler);
        self
    }

    /// Whether the cancellation token has been tripped
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(|token| token.load(Ordering::Relaxed))
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }

    pub(crate) fn verbose(&self, msg: &str) {
        if let Some(handler) = self.verbose_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!("{}", msg);
        }
    }
}
