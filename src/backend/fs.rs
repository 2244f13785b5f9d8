//! Directory-rooted backend: the backend namespace is mounted under a local directory
//! (an NFS/FUSE mount of the distributed store, or a plain directory when testing).

use anyhow::{Context, Result, bail};
use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use super::local::metadata_to_stat;
use super::{Backend, ObjectStat, ReadStream, Store, WriteStream};
use crate::engine::tools::local_hostname;
use crate::utils::config::TransferConsts;

/// Backend whose paths are absolute inside `root` (`/daloflow/a.bin` → `<root>/daloflow/a.bin`).
#[derive(Clone, Debug)]
pub struct FsBackend {
    root: PathBuf,
    /// Hosts reported for every block (replica order).
    hosts: Vec<String>,
    block_size: u64,
}

impl FsBackend {
    /// Connect to the namespace at `endpoint`. Fails unless it is an existing directory.
    pub fn connect(endpoint: &str) -> Result<Self> {
        let root = PathBuf::from(endpoint);
        let meta = fs::metadata(&root)
            .with_context(|| format!("connect to backend at {}", root.display()))?;
        if !meta.is_dir() {
            bail!("backend endpoint {} is not a directory", root.display());
        }
        debug!("Connected to backend at {}", root.display());
        Ok(Self {
            root,
            hosts: vec![local_hostname()],
            block_size: TransferConsts::BLOCK_SIZE,
        })
    }

    /// Report `hosts` as the replicas of every block instead of the local host.
    pub fn with_hosts(mut self, hosts: Vec<String>) -> Self {
        self.hosts = hosts;
        self
    }

    /// Size of the storage blocks used when answering placement queries.
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a backend path onto the mounted directory. `..` is refused so paths stay inside `root`.
    fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        let mut out = self.root.clone();
        for comp in path.components() {
            match comp {
                Component::Normal(part) => out.push(part),
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
                Component::ParentDir => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("backend path escapes namespace: {}", path.display()),
                    ));
                }
            }
        }
        Ok(out)
    }
}

impl Store for FsBackend {
    fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        Ok(Box::new(File::open(self.resolve(path)?)?))
    }

    fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        Ok(Box::new(File::create(self.resolve(path)?)?))
    }

    fn stat(&self, path: &Path) -> io::Result<ObjectStat> {
        metadata_to_stat(&fs::metadata(self.resolve(path)?)?)
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(self.resolve(path)?)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(self.resolve(path)?)
    }
}

impl Backend for FsBackend {
    fn get_block_locations(
        &self,
        path: &Path,
        offset: u64,
        length: u64,
    ) -> io::Result<Vec<Vec<String>>> {
        let st = self.stat(path)?;
        if st.is_dir {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }
        let blocks = blocks_in_range(st.size, self.block_size, offset, length);
        Ok((0..blocks).map(|_| self.hosts.clone()).collect())
    }

    fn disconnect(&self) {
        debug!("Disconnected from backend at {}", self.root.display());
    }
}

/// Number of `block_size` blocks of a `size`-byte object overlapping `[offset, offset + length)`.
/// An empty object still has one (empty) block at offset 0.
fn blocks_in_range(size: u64, block_size: u64, offset: u64, length: u64) -> u64 {
    if size == 0 {
        return u64::from(offset == 0);
    }
    if offset >= size || length == 0 {
        return 0;
    }
    let end = offset.saturating_add(length).min(size);
    let first = offset / block_size;
    let last = (end - 1) / block_size;
    last - first + 1
}
