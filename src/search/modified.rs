//! Recently modified files.

use super::{Observer, SearchEvent, report_walk_failure};
use crate::copy::check_source;
use crate::error::{Error, Result};
use chrono::{DateTime, Days, Local, NaiveTime, TimeZone};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// A file whose last write is newer than the search cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedFile {
    /// Path of the file, under the search root
    pub path: PathBuf,
    /// Last-write time
    pub modified: SystemTime,
}

/// How a modified-file cutoff was specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    /// Local midnight, this many days before today
    DaysAgo(u64),
    /// An exact instant
    Time(SystemTime),
}

impl Since {
    /// The instant files must have been modified after.
    ///
    /// # Errors
    ///
    /// Returns an error if `DaysAgo` reaches before the earliest
    /// representable date.
    pub fn cutoff(self) -> Result<SystemTime> {
        match self {
            Self::Time(time) => Ok(time),
            Self::DaysAgo(days) => midnight_days_ago(days).map(SystemTime::from),
        }
    }
}

impl fmt::Display for Since {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DaysAgo(days) => write!(f, "{days} days"),
            Self::Time(time) => write!(f, "{}", DateTime::<Local>::from(*time).format("%d/%m/%Y")),
        }
    }
}

fn midnight_days_ago(days: u64) -> Result<DateTime<Local>> {
    let naive = Local::now()
        .date_naive()
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{days} days before today is out of range"),
            ))
        })?
        .and_time(NaiveTime::MIN);

    // Midnight can fall in a DST gap; read it as UTC then.
    Ok(Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive)))
}

/// Find every regular file under `root`, at any depth, last written
/// strictly after `since`.
///
/// Files directly inside `root` are included, not only those in its
/// subdirectories. Results are sorted by path. Symlinks are not followed.
///
/// # Errors
///
/// Returns [`Error::SourceNotFound`] or [`Error::NotADirectory`] for a bad
/// root. Unreadable entries below the root are reported to `observer` and
/// skipped.
pub fn find_modified_files(
    root: &Path,
    since: SystemTime,
    observer: Observer<'_>,
) -> Result<Vec<ModifiedFile>> {
    check_source(root)?;

    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                report_walk_failure(observer, err);
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            observer(&SearchEvent::Directory(entry.path()));
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        match entry
            .metadata()
            .map_err(io::Error::from)
            .and_then(|meta| meta.modified())
        {
            Ok(modified) if modified > since => found.push(ModifiedFile {
                path: entry.into_path(),
                modified,
            }),
            Ok(_) => {}
            Err(error) => observer(&SearchEvent::Unreadable {
                path: Some(entry.path()),
                error: &error,
            }),
        }
    }

    found.sort_by(|a, b| a.path.cmp(&b.path));

    #[cfg(feature = "tracing")]
    tracing::debug!("{} modified files under {}", found.len(), root.display());

    Ok(found)
}

/// [`find_modified_files`] with a cutoff of local midnight `|days|` days
/// before today.
///
/// # Errors
///
/// Same as [`find_modified_files`], plus an out-of-range day count.
pub fn find_modified_files_since_days(
    root: &Path,
    days: i64,
    observer: Observer<'_>,
) -> Result<Vec<ModifiedFile>> {
    let since = Since::DaysAgo(days.unsigned_abs()).cutoff()?;
    find_modified_files(root, since, observer)
}
