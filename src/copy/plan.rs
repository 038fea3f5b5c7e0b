//! Tree traversal shared by the blocking and non-blocking replicators.
//!
//! The whole source tree is enumerated before anything is written, so a
//! missing or unreadable source never leaves a half-created destination.

use crate::error::{Error, Result};
use crate::options::{CopyOptions, CopyPolicy};
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// A source file and where it lands.
#[derive(Debug, Clone)]
pub(crate) struct FileEntry {
    pub src: PathBuf,
    pub dst: PathBuf,
}

/// Everything one replicator call will touch, in traversal order.
///
/// `dirs` lists destination directories parent-first; `files` lists each
/// directory's files before descending into its subdirectories.
#[derive(Debug, Default)]
pub(crate) struct CopyPlan {
    pub dirs: Vec<PathBuf>,
    pub files: Vec<FileEntry>,
}

/// What to do with one destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Transfer,
    Skip,
}

/// Decide the fate of a destination file from its (possibly missing) metadata.
///
/// A directory at the destination is never replaced by a file, whatever the
/// policy says.
pub(crate) fn decide(existing: io::Result<Metadata>, policy: CopyPolicy) -> io::Result<Action> {
    match existing {
        Ok(meta) if meta.is_dir() => Err(io::Error::new(
            io::ErrorKind::IsADirectory,
            "destination is a directory",
        )),
        Ok(_) if !policy.overwrite => Ok(Action::Skip),
        Ok(_) => Ok(Action::Transfer),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Action::Transfer),
        Err(e) => Err(e),
    }
}

/// Fail unless `src` exists and is a directory.
pub(crate) fn check_source(src: &Path) -> Result<()> {
    match fs::metadata(src) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::NotADirectory(src.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Error::SourceNotFound(src.to_path_buf()))
        }
        Err(source) => Err(Error::ReadDir {
            path: src.to_path_buf(),
            source,
        }),
    }
}

/// Enumerate `src` into a plan targeting `dst`.
pub(crate) fn build_plan(src: &Path, dst: &Path, options: &CopyOptions) -> Result<CopyPlan> {
    let mut plan = CopyPlan::default();
    let mut ancestors = Vec::new();
    collect(src, dst, options, &mut plan, &mut ancestors)?;
    Ok(plan)
}

fn collect(
    src: &Path,
    dst: &Path,
    options: &CopyOptions,
    plan: &mut CopyPlan,
    ancestors: &mut Vec<DirKey>,
) -> Result<()> {
    // Re-checked for every subdirectory: it may vanish between the parent's
    // enumeration and this call.
    check_source(src)?;

    let read_err = |source: io::Error| Error::ReadDir {
        path: src.to_path_buf(),
        source,
    };

    // Only the chain from the root to `src` counts: the same directory
    // reached through two sibling links is copied twice, not a loop.
    let key = dir_key(src).map_err(read_err)?;
    if ancestors.contains(&key) {
        return Err(Error::SymlinkLoop(src.to_path_buf()));
    }

    plan.dirs.push(dst.to_path_buf());

    let mut entries = fs::read_dir(src)
        .and_then(|iter| iter.collect::<io::Result<Vec<_>>>())
        .map_err(read_err)?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        let file_type = entry.file_type().map_err(read_err)?;

        let is_dir = if file_type.is_symlink() {
            // Symlinks are followed, like any other directory listing would.
            match fs::metadata(&src_path) {
                Ok(meta) if meta.is_dir() => true,
                Ok(meta) if meta.is_file() => false,
                Ok(_) => {
                    options.warn(&format!("Skipping special file: {}", src_path.display()));
                    continue;
                }
                Err(e) => {
                    options.warn(&format!(
                        "Skipping broken symlink {}: {}",
                        src_path.display(),
                        e
                    ));
                    continue;
                }
            }
        } else if file_type.is_dir() {
            true
        } else if file_type.is_file() {
            false
        } else {
            options.warn(&format!("Skipping special file: {}", src_path.display()));
            continue;
        };

        if is_dir {
            if options.policy.recurse {
                subdirs.push((src_path, dst_path));
            }
        } else {
            plan.files.push(FileEntry {
                src: src_path,
                dst: dst_path,
            });
        }
    }

    ancestors.push(key);
    for (sub_src, sub_dst) in subdirs {
        collect(&sub_src, &sub_dst, options, plan, ancestors)?;
    }
    ancestors.pop();

    Ok(())
}

/// Identity of a directory for loop detection.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DirKey {
    #[cfg_attr(not(unix), allow(dead_code))]
    Inode(u64, u64),
    #[cfg_attr(unix, allow(dead_code))]
    Canonical(PathBuf),
}

#[cfg(unix)]
fn dir_key(path: &Path) -> io::Result<DirKey> {
    use std::os::unix::fs::MetadataExt;
    let meta = fs::metadata(path)?;
    Ok(DirKey::Inode(meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn dir_key(path: &Path) -> io::Result<DirKey> {
    path.canonicalize().map(DirKey::Canonical)
}
