//! Preservation copies and metadata-carrying file copies

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Suffix appended to a target to name its preservation copy
pub const PRESERVE_SUFFIX: &str = ".new";

/// Timestamp format used to disambiguate preservation copies
pub const PRESERVE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Choose an unused preservation path for `target`
///
/// `<target>.new` if free, else `<target>.new.<YYYYMMDD_HHMMSS>`, else that
/// name with `_1`, `_2`, ... appended. Never returns an existing path.
pub fn preservation_path(target: &Path, now: DateTime<Local>) -> PathBuf {
    let plain = with_suffix(target, PRESERVE_SUFFIX);
    if !exists(&plain) {
        return plain;
    }

    let stamp = now.format(PRESERVE_TIMESTAMP_FORMAT).to_string();
    let stamped = with_suffix(target, &format!("{}.{}", PRESERVE_SUFFIX, stamp));
    if !exists(&stamped) {
        return stamped;
    }

    (1u32..)
        .map(|n| with_suffix(target, &format!("{}.{}_{}", PRESERVE_SUFFIX, stamp, n)))
        .find(|candidate| !exists(candidate))
        .unwrap_or(stamped)
}

/// Hidden sibling of `target` where a replacement is staged before being
/// renamed into place: `.<name>.bakr-tmp-<pid>`
pub fn staging_path(target: &Path) -> PathBuf {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    dir.join(format!(".{}.bakr-tmp-{}", name, std::process::id()))
}

/// Copy `from` to a new file `to`, carrying modification time and
/// permissions; the data is synced before returning
///
/// Fails with `AlreadyExists` rather than replace anything at `to`. A
/// partial copy is removed on failure.
pub fn copy_with_metadata(from: &Path, to: &Path) -> io::Result<u64> {
    let mut src = File::open(from)?;
    let metadata = src.metadata()?;

    let mut dest = OpenOptions::new().write(true).create_new(true).open(to)?;
    let filled = fill(&mut src, &mut dest, &metadata);
    drop(dest);

    let copied = filled.and_then(|bytes| {
        fs::set_permissions(to, metadata.permissions())?;
        Ok(bytes)
    });
    if copied.is_err() {
        let _ = fs::remove_file(to);
    }
    copied
}

fn fill(src: &mut File, dest: &mut File, metadata: &fs::Metadata) -> io::Result<u64> {
    let bytes = io::copy(src, dest)?;
    dest.sync_all()?;
    if let Ok(modified) = metadata.modified() {
        dest.set_modified(modified)?;
    }
    Ok(bytes)
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
