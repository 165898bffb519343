use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Path of `file` relative to the input directory it was found under.
///
/// Compares whole path components, so a root of `/data` never claims
/// a file under `/data2`.
pub fn relative_to_root(file: &Path, root: &Path) -> Result<PathBuf> {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => Ok(relative.to_path_buf()),
        _ => Err(Error::OutsideRoot {
            file: file.to_path_buf(),
            root: root.to_path_buf(),
        }),
    }
}

/// Name used when `original` is already taken in the destination folder.
pub fn collision_file_name(original: &OsStr, epoch_millis: i64) -> String {
    format!("{}-{}", epoch_millis, original.to_string_lossy())
}

/// First free `<millis>-<name>` path in `dir`, bumping the timestamp until nothing is there.
pub fn unique_collision_path(dir: &Path, original: &OsStr, epoch_millis: i64) -> PathBuf {
    let mut millis = epoch_millis;
    let mut path = dir.join(collision_file_name(original, millis));

    while path.exists() {
        millis += 1;
        path = dir.join(collision_file_name(original, millis));
    }

    path
}

/// Format duration in human-readable format
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    if secs == 0 {
        format!("{}ms", duration.as_millis())
    } else if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
