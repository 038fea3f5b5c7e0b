//! # fsclient
//!
//! Local filesystem helpers: directory replication, text I/O, file search and
//! zip archives.
//!
//! ## Core Features
//!
//! - **Directory replication**: Top-level or recursive, with an explicit
//!   overwrite policy, blocking ([`copy_dir`]) or on tokio ([`copy_dir_async`])
//! - **Atomic writes**: Uses temp file + rename so no partial files are left behind
//! - **Per-file outcomes**: Every file is reported as copied, skipped or failed
//! - **Skeleton cloning**: Recreate a directory structure without its files
//! - **Cancellation**: Cooperative, via a shared `AtomicBool`
//! - **Searches**: Recently modified files and phrase-in-files, with HTML reports
//! - **Zip archives**: Create, extract and unzip with path-traversal protection
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use fsclient::CopyBuilder;
//!
//! let report = CopyBuilder::new("src", "dst")
//!     .recursive()
//!     .skip_existing()
//!     .run()?;
//! println!("Copied {} files ({} bytes)", report.files_copied, report.bytes_copied);
//! # Ok::<(), fsclient::Error>(())
//! ```
//!
//! ## Function API
//!
//! ```no_run
//! use fsclient::{copy_dir, CopyOptions, CopyPolicy};
//! use std::path::Path;
//!
//! let options = CopyOptions::default()
//!     .with_policy(CopyPolicy::new().recurse(true).overwrite(false))
//!     .continue_on_error();
//!
//! let report = copy_dir(Path::new("src"), Path::new("dst"), &options)?;
//! for failure in report.failures() {
//!     eprintln!("failed: {}", failure.src.display());
//! }
//! # Ok::<(), fsclient::Error>(())
//! ```
//!
//! ## Non-blocking Replication
//!
//! ```no_run
//! use fsclient::{copy_dir_async, CopyOptions};
//! use std::path::Path;
//!
//! # async fn demo() -> fsclient::Result<()> {
//! let report = copy_dir_async(Path::new("src"), Path::new("dst"), &CopyOptions::default()).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Safety Guarantees
//!
//! ### Atomic Writes
//!
//! Files are written to a temporary file in the destination directory, then
//! renamed atomically. A failed or cancelled transfer leaves the destination
//! absent or with its previous content.
//!
//! ### No-Overwrite Races
//!
//! With overwrite disabled, the final rename uses `persist_noclobber`, so a
//! file created between the existence check and the rename is left alone and
//! the source file is reported as skipped.
//!
//! ### Symlinks
//!
//! Replication follows symlinks; a link that leads back into a directory
//! already being copied is reported as [`Error::SymlinkLoop`].
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `progress` | Spinner support with indicatif |
//! | `tracing` | Structured logging with tracing crate |
//! | `serde` | Serialize/Deserialize for [`CopyOptions`] and [`CopyPolicy`] |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod archive;
mod builder;
mod copy;
mod error;
mod options;
pub mod search;
pub mod text;
mod utils;

#[cfg(feature = "progress")]
mod progress;

pub use archive::ArchiveStats;
pub use builder::CopyBuilder;
pub use copy::{
    AsyncTransfer, AtomicTransfer, CopyReport, FileOutcome, FileRecord, SkeletonStats,
    TokioTransfer, Transfer, clone_skeleton, copy_dir, copy_dir_async, copy_dir_async_with,
    copy_dir_with,
};
pub use error::{Error, ErrorCode, Result, is_no_space_error};
pub use options::{CopyOptions, CopyPolicy};

#[cfg(feature = "progress")]
#[cfg_attr(docsrs, doc(cfg(feature = "progress")))]
pub use progress::create_spinner;
