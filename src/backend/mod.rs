//! Storage collaborators: the [`Store`] capability shared by the local cache and the remote
//! backend, and the [`Backend`] extension for remote-only operations.
//!
//! A single backend handle is shared by every worker for the whole run, so implementations
//! must tolerate concurrent calls from many threads (`Send + Sync` is required by the trait).

use log::debug;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::SystemTime;

pub mod fs;
pub mod local;

pub use fs::FsBackend;
pub use local::LocalFs;

/// Readable object stream. A zero-length read is end of stream.
pub type ReadStream = Box<dyn Read + Send>;

/// Writable object stream. Flush before dropping; dropping closes it.
pub type WriteStream = Box<dyn Write + Send>;

/// Metadata for one path in a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectStat {
    pub modified: SystemTime,
    pub size: u64,
    pub is_dir: bool,
}

/// Open/stat/mkdir over one namespace. Missing paths are `ErrorKind::NotFound`.
pub trait Store: Send + Sync {
    fn open_read(&self, path: &Path) -> io::Result<ReadStream>;

    /// Create (or truncate) `path` for writing. Parent directories must exist.
    fn open_write(&self, path: &Path) -> io::Result<WriteStream>;

    fn stat(&self, path: &Path) -> io::Result<ObjectStat>;

    /// Create a single directory; the parent must exist.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Make sure `path` exists as a directory, creating missing ancestors first.
    ///
    /// Best effort: creation errors are ignored so that workers racing on the same
    /// ancestor never fail each other. A later open reports anything that really went wrong.
    fn ensure_dir(&self, path: &Path) {
        if path.as_os_str().is_empty() {
            return;
        }
        if let Ok(st) = self.stat(path) {
            if !st.is_dir {
                debug!("{} exists and is not a directory", path.display());
            }
            return;
        }
        if let Some(parent) = path.parent() {
            self.ensure_dir(parent);
        }
        if let Err(e) = self.create_dir(path) {
            debug!("mkdir {}: {}", path.display(), e);
        }
    }
}

/// Remote distributed-storage backend.
pub trait Backend: Store {
    /// Hosts holding each block overlapping `[offset, offset + length)`, in block order.
    fn get_block_locations(
        &self,
        path: &Path,
        offset: u64,
        length: u64,
    ) -> io::Result<Vec<Vec<String>>>;

    /// Recursive mkdir on the backend. Same best-effort contract as [`Store::ensure_dir`].
    fn create_directory_recursive(&self, path: &Path) {
        self.ensure_dir(path);
    }

    /// Release the connection. Called once by the lifecycle after all workers are joined.
    fn disconnect(&self) {}
}

/// True when `err` means the path does not exist.
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}
