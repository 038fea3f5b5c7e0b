//! Whole-file text helpers.
//!
//! Writes are line-oriented: the text is followed by a single `\n`, and blank
//! text is never written at all. Missing parent directories are created.

use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Read a whole file as UTF-8.
///
/// A missing file reads as the empty string.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not UTF-8.
pub fn read_all_text(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write `text` plus a trailing newline to `path`.
///
/// `append` selects between appending and truncating. Returns `false`
/// without touching the filesystem when `text` is empty or whitespace.
///
/// # Errors
///
/// Returns an error if a parent directory cannot be created or the file
/// cannot be written.
pub fn write_text(path: &Path, text: &str, append: bool) -> Result<bool> {
    if text.trim().is_empty() {
        return Ok(false);
    }
    if let Some(parent) = parent_of(path) {
        fs::create_dir_all(parent)?;
    }

    let mut file = open_options(append).open(path)?;
    writeln!(file, "{text}")?;
    file.flush()?;

    #[cfg(feature = "tracing")]
    tracing::debug!("wrote {} bytes to {}", text.len() + 1, path.display());

    Ok(true)
}

/// Non-blocking [`write_text`] on tokio, with identical semantics.
///
/// # Errors
///
/// Same as [`write_text`].
pub async fn write_text_async(path: &Path, text: &str, append: bool) -> Result<bool> {
    if text.trim().is_empty() {
        return Ok(false);
    }
    if let Some(parent) = parent_of(path) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = tokio::fs::OpenOptions::from(open_options(append))
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;

    #[cfg(feature = "tracing")]
    tracing::debug!("wrote {} bytes to {}", text.len() + 1, path.display());

    Ok(true)
}

/// Delete a file. Returns whether there was one to delete.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn delete_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn parent_of(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

fn open_options(append: bool) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options
}
