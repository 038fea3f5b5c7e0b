//! Strategies for moving one file's bytes.
//!
//! The replicators own traversal and conflict decisions; a transfer only
//! gets a source and a destination it is allowed to write. Both built-in
//! strategies stage the bytes in a temp file next to the destination and
//! rename it into place, so an interrupted transfer leaves the destination
//! either absent or holding its previous content.

use crate::options::CopyOptions;
use filetime::{FileTime, set_file_times};
use std::fs::{self, File, Metadata};
use std::future::Future;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Blocking transfer of a single file.
///
/// Implementations must honor `options.policy.overwrite` when the
/// destination appears between the replicator's existence check and the
/// write: with overwrite off they fail with [`io::ErrorKind::AlreadyExists`].
pub trait Transfer {
    /// Copy `src` to `dst`, returning the number of bytes written.
    fn transfer(&self, src: &Path, dst: &Path, options: &CopyOptions) -> io::Result<u64>;
}

/// Non-blocking transfer of a single file.
///
/// Same contract as [`Transfer`]; the returned future may be dropped at any
/// suspension point without leaving a partial destination behind.
pub trait AsyncTransfer {
    /// Copy `src` to `dst`, returning the number of bytes written.
    fn transfer(
        &self,
        src: &Path,
        dst: &Path,
        options: &CopyOptions,
    ) -> impl Future<Output = io::Result<u64>> + Send;
}

/// Default blocking strategy: temp file + atomic rename.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicTransfer;

impl Transfer for AtomicTransfer {
    fn transfer(&self, src: &Path, dst: &Path, options: &CopyOptions) -> io::Result<u64> {
        let src_meta = fs::metadata(src)?;
        let mut reader = File::open(src)?;
        let mut staged = stage_next_to(dst)?;

        let bytes = io::copy(&mut reader, staged.as_file_mut())?;

        if options.fsync {
            staged.as_file().sync_all()?;
        }
        commit(staged, &src_meta, dst, options)?;
        Ok(bytes)
    }
}

/// Default non-blocking strategy: chunked tokio reads and writes into a
/// staged temp file, checking the cancellation token between chunks.
///
/// Creating the temp file and the final rename run on tokio's blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct TokioTransfer {
    chunk_size: usize,
}

impl TokioTransfer {
    /// Default chunk size in bytes
    pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

    /// Strategy with a custom chunk size (clamped to at least 1 byte).
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }
}

impl Default for TokioTransfer {
    fn default() -> Self {
        Self::with_chunk_size(Self::DEFAULT_CHUNK_SIZE)
    }
}

impl AsyncTransfer for TokioTransfer {
    async fn transfer(&self, src: &Path, dst: &Path, options: &CopyOptions) -> io::Result<u64> {
        let src_meta = tokio::fs::metadata(src).await?;
        let mut reader = tokio::fs::File::open(src).await?;
        let dst = dst.to_path_buf();
        let (staged, handle) = blocking({
            let dst = dst.clone();
            move || {
                let staged = stage_next_to(&dst)?;
                let handle = staged.as_file().try_clone()?;
                Ok((staged, handle))
            }
        })
        .await?;
        let mut writer = tokio::fs::File::from_std(handle);

        let mut buf = vec![0u8; self.chunk_size];
        let mut bytes = 0u64;
        loop {
            if options.is_cancelled() {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "transfer cancelled",
                ));
            }
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n]).await?;
            bytes += n as u64;
        }

        writer.flush().await?;
        if options.fsync {
            writer.sync_all().await?;
        }
        drop(writer);

        let finish = Finish::from(options);
        let timestamps = blocking({
            let dst = dst.clone();
            move || commit_staged(staged, &src_meta, &dst, finish)
        })
        .await?;
        warn_timestamps(&dst, timestamps, options);
        Ok(bytes)
    }
}

/// Run a blocking filesystem step on tokio's blocking pool.
async fn blocking<T, F>(f: F) -> io::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(io::Error::other)?
}

/// Create the temp file that will become `dst`.
fn stage_next_to(dst: &Path) -> io::Result<NamedTempFile> {
    let parent = match dst.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".fsclient-")
        .suffix(".partial")
        .tempfile_in(parent)
}

/// The parts of [`CopyOptions`] a commit needs, detached from the borrow.
#[derive(Debug, Clone, Copy)]
struct Finish {
    permissions: bool,
    timestamps: bool,
    overwrite: bool,
}

impl From<&CopyOptions> for Finish {
    fn from(options: &CopyOptions) -> Self {
        Self {
            permissions: options.preserve_permissions,
            timestamps: options.preserve_timestamps,
            overwrite: options.policy.overwrite,
        }
    }
}

/// Apply source metadata to the staged file and rename it over `dst`.
fn commit(
    staged: NamedTempFile,
    src_meta: &Metadata,
    dst: &Path,
    options: &CopyOptions,
) -> io::Result<()> {
    let timestamps = commit_staged(staged, src_meta, dst, Finish::from(options))?;
    warn_timestamps(dst, timestamps, options);
    Ok(())
}

/// Rename the staged file into place. A failure to copy timestamps does not
/// fail the transfer; it is handed back for the caller to report.
fn commit_staged(
    staged: NamedTempFile,
    src_meta: &Metadata,
    dst: &Path,
    finish: Finish,
) -> io::Result<Option<io::Error>> {
    if finish.permissions {
        fs::set_permissions(staged.path(), src_meta.permissions())?;
    }

    if finish.overwrite {
        staged.persist(dst).map_err(|e| e.error)?;
    } else {
        staged.persist_noclobber(dst).map_err(|e| e.error)?;
    }

    if !finish.timestamps {
        return Ok(None);
    }
    let mtime = FileTime::from_last_modification_time(src_meta);
    let atime = FileTime::from_last_access_time(src_meta);
    Ok(set_file_times(dst, atime, mtime).err())
}

fn warn_timestamps(dst: &Path, error: Option<io::Error>, options: &CopyOptions) {
    if let Some(e) = error {
        options.warn(&format!(
            "Failed to preserve timestamps on {}: {}",
            dst.display(),
            e
        ));
    }
}
