//! Path helpers shared by the replicators, the skeleton cloner and the
//! archive code.

use std::path::{Component, Path, PathBuf};

/// Map `path`, which lives under `src_root`, onto the same relative location
/// under `dst_root`.
///
/// Works on path components, so a root whose text reappears deeper in the
/// tree (`/data/data/x`) is only stripped once, at the front.
///
/// Returns `None` when `path` is not under `src_root`.
pub(crate) fn rebase(path: &Path, src_root: &Path, dst_root: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(src_root).ok()?;
    if relative.as_os_str().is_empty() {
        Some(dst_root.to_path_buf())
    } else {
        Some(dst_root.join(relative))
    }
}

/// Name of a zip entry for `relative`, always `/`-separated.
///
/// Directory entries get a trailing `/`.
pub(crate) fn archive_entry_name(relative: &Path, is_dir: bool) -> String {
    let mut name = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if is_dir && !name.is_empty() {
        name.push('/');
    }
    name
}
