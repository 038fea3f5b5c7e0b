//! Directory replication.
//!
//! Both replicators enumerate the source tree first, then create the
//! destination directories, then hand each file to a transfer strategy.
//! Conflict decisions and reporting are shared, so the blocking and
//! non-blocking variants agree on every outcome.

mod async_dir;
mod dir;
mod plan;
mod report;
mod skeleton;
mod transfer;

// Re-export public API
pub use async_dir::{copy_dir_async, copy_dir_async_with};
pub use dir::{copy_dir, copy_dir_with};
pub use report::{CopyReport, FileOutcome, FileRecord};
pub use skeleton::{SkeletonStats, clone_skeleton};
pub use transfer::{AsyncTransfer, AtomicTransfer, TokioTransfer, Transfer};

pub(crate) use plan::check_source;
