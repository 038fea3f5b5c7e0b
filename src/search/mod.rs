//! Read-only searches over a directory tree.
//!
//! Both searches walk the whole tree under a root and report progress
//! through an observer instead of printing. Entries that cannot be read are
//! announced with [`SearchEvent::Unreadable`] and skipped.
//!
//! # Example
//!
//! ```no_run
//! use fsclient::search::{self, PhraseSearch, SearchEvent};
//! use std::path::Path;
//!
//! let log = |event: &SearchEvent<'_>| {
//!     if let SearchEvent::Directory(dir) = event {
//!         eprintln!("  Checking {}", dir.display());
//!     }
//! };
//!
//! let results = PhraseSearch::new("TODO, FIXME")
//!     .ignore_case(true)
//!     .with_patterns(["*.rs"])
//!     .run(Path::new("src"), &log)?;
//! let recent = search::find_modified_files_since_days(Path::new("src"), 7, &search::silent)?;
//! # Ok::<(), fsclient::Error>(())
//! ```

mod modified;
mod phrase;
pub mod report;

use std::io;
use std::path::Path;

pub use modified::{ModifiedFile, Since, find_modified_files, find_modified_files_since_days};
pub use phrase::{PhraseMatches, PhraseSearch};

/// Progress notification from a search.
#[derive(Debug)]
pub enum SearchEvent<'a> {
    /// A directory is about to be scanned
    Directory(&'a Path),
    /// Matching is about to start for a phrase
    Phrase(&'a str),
    /// An entry could not be read and was skipped
    Unreadable {
        /// The entry, when the failure could be tied to one
        path: Option<&'a Path>,
        /// What went wrong
        error: &'a io::Error,
    },
}

/// Observer callback shared by the searches.
///
/// Must be `Sync`: phrase search reports unreadable files from worker
/// threads.
pub type Observer<'a> = &'a (dyn Fn(&SearchEvent<'_>) + Sync);

/// Observer that ignores every event.
pub fn silent(_event: &SearchEvent<'_>) {}

/// Report a walk error to `observer`.
fn report_walk_failure(observer: Observer<'_>, err: walkdir::Error) {
    let path = err.path().map(Path::to_path_buf);
    let error = io::Error::from(err);
    observer(&SearchEvent::Unreadable {
        path: path.as_deref(),
        error: &error,
    });
}
