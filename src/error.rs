//! Error types for fsclient.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur during filesystem operations, the [`Result`] type alias and
//! the stable [`ErrorCode`] classification used by front ends.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | IO | [`Error::Io`], [`Error::Transfer`], [`Error::CreateDir`], [`Error::ReadDir`], [`Error::Walk`] |
//! | Validation | [`Error::SourceNotFound`], [`Error::NotADirectory`], [`Error::InvalidPattern`] |
//! | Conflict | [`Error::AlreadyExists`] |
//! | Partial | [`Error::PartialCopy`] |
//! | Archive | [`Error::Zip`], [`Error::UnsafeArchivePath`] |
//! | Safety | [`Error::SymlinkLoop`] |
//! | Control | [`Error::Cancelled`] |

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fsclient operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Check if an IO error indicates "no space left on device".
///
/// | Platform | Error Detection |
/// |----------|-----------------|
/// | Unix | `ENOSPC` (errno 28) |
/// | Windows | `ERROR_DISK_FULL` (0x70) |
pub fn is_no_space_error(error: &io::Error) -> bool {
    if error.kind() == io::ErrorKind::StorageFull {
        return true;
    }

    #[cfg(unix)]
    {
        const ENOSPC: i32 = 28;
        if error.raw_os_error() == Some(ENOSPC) {
            return true;
        }
    }

    #[cfg(windows)]
    {
        const ERROR_DISK_FULL: i32 = 112;
        if error.raw_os_error() == Some(ERROR_DISK_FULL) {
            return true;
        }
    }

    false
}

/// Stable, machine-readable classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Source path does not exist
    SourceNotFound,
    /// Source path is not a directory
    NotADirectory,
    /// Destination already exists
    AlreadyExists,
    /// Destination storage is full
    NoSpace,
    /// Access denied by the filesystem
    PermissionDenied,
    /// Any other IO failure
    IoError,
    /// Archive could not be read or written
    ArchiveError,
    /// Caller-supplied input was rejected
    InvalidInput,
    /// Operation stopped via cancellation token
    Cancelled,
    /// Failure in the library or its runtime
    Internal,
}

impl ErrorCode {
    /// Snake-case name of the code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceNotFound => "source_not_found",
            Self::NotADirectory => "not_a_directory",
            Self::AlreadyExists => "already_exists",
            Self::NoSpace => "no_space",
            Self::PermissionDenied => "permission_denied",
            Self::IoError => "io_error",
            Self::ArchiveError => "archive_error",
            Self::InvalidInput => "invalid_input",
            Self::Cancelled => "cancelled",
            Self::Internal => "internal",
        }
    }

    /// Classify a raw IO error.
    pub fn from_io(error: &io::Error) -> Self {
        if is_no_space_error(error) {
            Self::NoSpace
        } else if error.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied
        } else {
            Self::IoError
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during fsclient operations.
///
/// All errors include relevant path information to aid debugging.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source path does not exist
    #[error("Source directory does not exist or could not be found: {0}")]
    SourceNotFound(PathBuf),

    /// Source is not a directory
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Destination already exists
    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Moving one file's bytes failed
    #[error("Failed to copy {src} to {dst}: {source}")]
    Transfer {
        /// Source file
        src: PathBuf,
        /// Destination file
        dst: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to create a destination directory
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Failed to enumerate a source directory
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        /// Directory that could not be read
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },

    /// Some files failed while `continue_on_error` was set
    #[error("Failed to copy {failed} of {total} files")]
    PartialCopy {
        /// Number of files that failed to copy
        failed: usize,
        /// Total number of files visited
        total: usize,
    },

    /// Directory walk failed
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Zip archive could not be read or written
    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Archive entry would be written outside the target directory
    #[error("Archive entry escapes the target directory: {0}")]
    UnsafeArchivePath(String),

    /// File-name wildcard could not be compiled
    #[error("Invalid file pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending wildcard
        pattern: String,
        /// Underlying error
        source: globset::Error,
    },

    /// Followed symlinks lead back into a directory already visited
    #[error("Symlink loop detected: {0}")]
    SymlinkLoop(PathBuf),

    /// Operation was cancelled via cancellation token
    ///
    /// Files already copied stay in place. Re-running with
    /// `overwrite` disabled resumes where the cancelled run stopped.
    #[error("Operation cancelled ({files_copied} files copied, {bytes_copied} bytes)")]
    Cancelled {
        /// Number of files copied before cancellation
        files_copied: u64,
        /// Total bytes copied before cancellation
        bytes_copied: u64,
        /// Number of files skipped before cancellation
        files_skipped: u64,
        /// Number of directories created before cancellation
        dirs_created: u64,
    },
}

impl Error {
    /// Stable classification of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::SourceNotFound(_) => ErrorCode::SourceNotFound,
            Self::NotADirectory(_) => ErrorCode::NotADirectory,
            Self::AlreadyExists(_) => ErrorCode::AlreadyExists,
            Self::Io(source)
            | Self::Transfer { source, .. }
            | Self::CreateDir { source, .. }
            | Self::ReadDir { source, .. } => ErrorCode::from_io(source),
            Self::Walk(err) => err.io_error().map_or(ErrorCode::IoError, ErrorCode::from_io),
            Self::PartialCopy { .. } | Self::SymlinkLoop(_) => ErrorCode::IoError,
            Self::Zip(_) | Self::UnsafeArchivePath(_) => ErrorCode::ArchiveError,
            Self::InvalidPattern { .. } => ErrorCode::InvalidInput,
            Self::Cancelled { .. } => ErrorCode::Cancelled,
        }
    }
}
