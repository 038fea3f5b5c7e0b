//! Zip archives of directory trees.
//!
//! Entry names always use `/` separators and directories get explicit
//! entries, so empty directories survive a round trip. Extraction rejects
//! entry names that escape the target directory and never writes through a
//! symlink found beneath it.
//!
//! # Example
//!
//! ```no_run
//! use fsclient::archive::{create_archive, extract_archive};
//! use std::path::Path;
//!
//! create_archive(Path::new("reports"), Path::new("reports.zip"), true)?;
//! let stats = extract_archive(Path::new("reports.zip"), Path::new("restore"))?;
//! println!("{} files, {} directories", stats.files, stats.dirs);
//! # Ok::<(), fsclient::Error>(())
//! ```

use crate::copy::check_source;
use crate::error::{Error, Result};
use crate::utils::path::archive_entry_name;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// What an archive operation wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Number of file entries
    pub files: u64,
    /// Number of directory entries
    pub dirs: u64,
}

/// Extract `zip_path` into `dest`, refusing to replace existing files.
///
/// Every entry is checked before anything is written: an unsafe name or a
/// file that already exists leaves `dest` untouched.
///
/// # Errors
///
/// - [`Error::UnsafeArchivePath`] if an entry would land outside `dest` or
///   pass through a symlink already present under it
/// - [`Error::AlreadyExists`] if a target file exists
/// - [`Error::Zip`] if the archive is malformed
pub fn extract_archive(zip_path: &Path, dest: &Path) -> Result<ArchiveStats> {
    extract(zip_path, dest, false)
}

/// Extract `zip_path` into `dest`, preserving the entries' directory
/// hierarchy and replacing files that already exist.
///
/// # Errors
///
/// Same as [`extract_archive`], except existing files are not an error.
pub fn unzip_files(zip_path: &Path, dest: &Path) -> Result<ArchiveStats> {
    extract(zip_path, dest, true)
}

/// Whether any existing component of `dest/relative` below `dest` is a symlink.
fn through_symlink(dest: &Path, relative: &Path) -> bool {
    let mut path = dest.to_path_buf();
    for component in relative.components() {
        path.push(component);
        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
    false
}

struct Planned {
    index: usize,
    target: PathBuf,
    is_dir: bool,
    #[cfg_attr(not(unix), allow(dead_code))]
    mode: Option<u32>,
}

fn extract(zip_path: &Path, dest: &Path, overwrite: bool) -> Result<ArchiveStats> {
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;

    let mut planned = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| Error::UnsafeArchivePath(entry.name().to_string()))?;
        if through_symlink(dest, &relative) {
            return Err(Error::UnsafeArchivePath(entry.name().to_string()));
        }
        let target = dest.join(relative);
        if !overwrite && !entry.is_dir() && target.exists() {
            return Err(Error::AlreadyExists(target));
        }
        planned.push(Planned {
            index,
            target,
            is_dir: entry.is_dir(),
            mode: entry.unix_mode(),
        });
    }

    let mut stats = ArchiveStats::default();
    for item in planned {
        if item.is_dir {
            fs::create_dir_all(&item.target).map_err(|source| Error::CreateDir {
                path: item.target.clone(),
                source,
            })?;
            stats.dirs += 1;
            continue;
        }

        if let Some(parent) = item.target.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let mut out = match options.open(&item.target) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(Error::AlreadyExists(item.target));
            }
            Err(e) => return Err(e.into()),
        };

        let mut entry = archive.by_index(item.index)?;
        io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = item.mode {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&item.target, fs::Permissions::from_mode(mode & 0o7777))?;
        }

        stats.files += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "extracted {} files and {} directories from {} into {}",
        stats.files,
        stats.dirs,
        zip_path.display(),
        dest.display()
    );

    Ok(stats)
}

/// Zip every file and directory under `src` into a new archive at
/// `zip_path`, using Deflate at the fastest level.
///
/// With `include_base_dir`, entry names are prefixed with `src`'s own name.
/// The archive is staged next to `zip_path` and only appears there once
/// complete. Symlinks are followed.
///
/// # Errors
///
/// - [`Error::SourceNotFound`] / [`Error::NotADirectory`] for a bad source
/// - [`Error::AlreadyExists`] if `zip_path` already exists
/// - [`Error::Walk`], [`Error::Zip`] or [`Error::Io`] while writing
pub fn create_archive(src: &Path, zip_path: &Path, include_base_dir: bool) -> Result<ArchiveStats> {
    check_source(src)?;
    if zip_path.exists() {
        return Err(Error::AlreadyExists(zip_path.to_path_buf()));
    }

    let base = if include_base_dir {
        src.canonicalize()?.file_name().map(PathBuf::from)
    } else {
        None
    };

    // Collect first: the staged archive may live inside `src`.
    let mut entries = Vec::new();
    for entry in WalkDir::new(src)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        let file_type = entry.file_type();
        if !file_type.is_dir() && !file_type.is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(src).map_err(io::Error::other)?;
        let relative = match &base {
            Some(base) => base.join(relative),
            None => relative.to_path_buf(),
        };
        entries.push((entry.into_path(), relative, file_type.is_dir()));
    }

    let parent = match zip_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".fsclient-")
        .suffix(".zip.partial")
        .tempfile_in(parent)?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(1));
    let mut writer = ZipWriter::new(staged.reopen()?);
    let mut stats = ArchiveStats::default();

    if let Some(base) = &base {
        writer.add_directory(archive_entry_name(base, true), options)?;
        stats.dirs += 1;
    }

    for (path, relative, is_dir) in entries {
        if is_dir {
            writer.add_directory(archive_entry_name(&relative, true), options)?;
            stats.dirs += 1;
            continue;
        }

        let file_options = with_source_mode(options, &path)?;
        writer.start_file(archive_entry_name(&relative, false), file_options)?;
        let mut reader = File::open(&path)?;
        io::copy(&mut reader, &mut writer)?;
        stats.files += 1;
    }

    writer.finish()?.sync_all()?;
    staged
        .persist_noclobber(zip_path)
        .map_err(|e| match e.error.kind() {
            io::ErrorKind::AlreadyExists => Error::AlreadyExists(zip_path.to_path_buf()),
            _ => Error::Io(e.error),
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "archived {} files and {} directories from {} into {}",
        stats.files,
        stats.dirs,
        src.display(),
        zip_path.display()
    );

    Ok(stats)
}

#[cfg(unix)]
fn with_source_mode(options: SimpleFileOptions, path: &Path) -> io::Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode();
    Ok(options.unix_permissions(mode & 0o7777))
}

#[cfg(not(unix))]
fn with_source_mode(options: SimpleFileOptions, _path: &Path) -> io::Result<SimpleFileOptions> {
    Ok(options)
}
