//! Path, host and timestamp utilities

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Join a listed path onto a root. A leading `/` on `rel` is dropped so the root is never replaced.
pub fn join_rel(root: &Path, rel: &Path) -> PathBuf {
    root.join(rel.strip_prefix("/").unwrap_or(rel))
}

/// Strip the line terminator from a list-file line (`\n`, and a `\r` before it).
pub fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Path from raw list-file bytes. Any byte sequence is a valid path on Unix.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(std::ffi::OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// This machine's hostname, as compared against block locations.
pub fn local_hostname() -> String {
    sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_string())
}

/// How the local copy's mtime relates to the backend object's.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MtimeOrder {
    /// Local is strictly newer.
    Newer,
    /// Local is strictly older, or missing.
    Older,
    Equal,
}

/// Compare local mtime (None when the local file does not exist) against the backend mtime.
pub fn compare_mtime(local: Option<SystemTime>, remote: SystemTime) -> MtimeOrder {
    match local.map(|t| t.cmp(&remote)) {
        None | Some(Ordering::Less) => MtimeOrder::Older,
        Some(Ordering::Greater) => MtimeOrder::Newer,
        Some(Ordering::Equal) => MtimeOrder::Equal,
    }
}
