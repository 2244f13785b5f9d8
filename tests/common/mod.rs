//! Shared fixtures: an in-memory backend that counts stream calls, and list-file helpers.
#![allow(dead_code)]

use cachecp::backend::{Backend, ObjectStat, ReadStream, Store, WriteStream};
use cachecp::engine::{LocalityRecord, RecordSink};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

#[derive(Default)]
pub struct Counters {
    pub opens: AtomicUsize,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl Counters {
    pub fn total(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
            + self.reads.load(Ordering::SeqCst)
            + self.writes.load(Ordering::SeqCst)
    }
}

struct Object {
    data: Arc<Vec<u8>>,
    modified: SystemTime,
}

#[derive(Default)]
struct Inner {
    objects: Mutex<HashMap<PathBuf, Object>>,
    dirs: Mutex<HashSet<PathBuf>>,
}

/// Objects and directories kept in memory. Writers commit on drop with the current time as mtime.
/// Writing requires the parent directory to exist, like a real filesystem.
pub struct MemoryBackend {
    inner: Arc<Inner>,
    pub counters: Arc<Counters>,
    hosts: Vec<String>,
    /// Max bytes handed out per read/write call, to exercise partial transfers.
    chunk: usize,
    /// Reads fail once this many bytes of an object have been handed out.
    fail_reads_after: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::default()),
            counters: Arc::new(Counters::default()),
            hosts: vec!["localhost".to_string()],
            chunk: 4096,
            fail_reads_after: None,
        }
    }

    pub fn with_hosts(mut self, hosts: &[&str]) -> Self {
        self.hosts = hosts.iter().map(|h| h.to_string()).collect();
        self
    }

    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk;
        self
    }

    pub fn with_read_failure_after(mut self, bytes: usize) -> Self {
        self.fail_reads_after = Some(bytes);
        self
    }

    pub fn insert(&self, path: &str, data: &[u8], modified: SystemTime) {
        let path = PathBuf::from(path);
        let mut dirs = self.inner.dirs.lock();
        let mut dir = path.parent();
        while let Some(d) = dir {
            dirs.insert(d.to_path_buf());
            dir = d.parent();
        }
        self.inner.objects.lock().insert(
            path,
            Object {
                data: Arc::new(data.to_vec()),
                modified,
            },
        );
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.inner
            .objects
            .lock()
            .get(Path::new(path))
            .map(|o| o.data.as_ref().clone())
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.inner.dirs.lock().contains(Path::new(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.as_os_str().is_empty() || path == Path::new("/") || self.inner.dirs.lock().contains(path)
    }
}

struct MemReader {
    data: Arc<Vec<u8>>,
    pos: usize,
    chunk: usize,
    fail_after: Option<usize>,
    counters: Arc<Counters>,
}

impl Read for MemReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.counters.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| self.pos >= limit) {
            return Err(io::Error::other("connection reset by backend"));
        }
        let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

struct MemWriter {
    path: PathBuf,
    buf: Vec<u8>,
    chunk: usize,
    inner: Arc<Inner>,
    counters: Arc<Counters>,
}

impl Write for MemWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.counters.writes.fetch_add(1, Ordering::SeqCst);
        let n = buf.len().min(self.chunk);
        self.buf.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MemWriter {
    fn drop(&mut self) {
        self.inner.objects.lock().insert(
            self.path.clone(),
            Object {
                data: Arc::new(std::mem::take(&mut self.buf)),
                modified: SystemTime::now(),
            },
        );
    }
}

impl Store for MemoryBackend {
    fn open_read(&self, path: &Path) -> io::Result<ReadStream> {
        let data = self
            .inner
            .objects
            .lock()
            .get(path)
            .map(|o| Arc::clone(&o.data))
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemReader {
            data,
            pos: 0,
            chunk: self.chunk,
            fail_after: self.fail_reads_after,
            counters: Arc::clone(&self.counters),
        }))
    }

    fn open_write(&self, path: &Path) -> io::Result<WriteStream> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !self.is_dir(parent) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemWriter {
            path: path.to_path_buf(),
            buf: Vec::new(),
            chunk: self.chunk,
            inner: Arc::clone(&self.inner),
            counters: Arc::clone(&self.counters),
        }))
    }

    fn stat(&self, path: &Path) -> io::Result<ObjectStat> {
        if let Some(o) = self.inner.objects.lock().get(path) {
            return Ok(ObjectStat {
                modified: o.modified,
                size: o.data.len() as u64,
                is_dir: false,
            });
        }
        if self.is_dir(path) {
            return Ok(ObjectStat {
                modified: SystemTime::UNIX_EPOCH,
                size: 0,
                is_dir: true,
            });
        }
        Err(io::Error::from(io::ErrorKind::NotFound))
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Path::new(""));
        if !self.is_dir(parent) {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        if !self.inner.dirs.lock().insert(path.to_path_buf()) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.inner
            .objects
            .lock()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

impl Backend for MemoryBackend {
    fn get_block_locations(
        &self,
        path: &Path,
        _offset: u64,
        _length: u64,
    ) -> io::Result<Vec<Vec<String>>> {
        self.stat(path)?;
        Ok(vec![self.hosts.clone()])
    }
}

/// Collects records in memory.
#[derive(Default)]
pub struct VecSink {
    pub records: Mutex<Vec<LocalityRecord>>,
}

impl RecordSink for VecSink {
    fn emit(&self, record: &LocalityRecord) -> io::Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}

pub fn secs(n: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(n)
}

/// Deterministic payload of `len` bytes.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

/// Write a list file with one entry per line.
pub fn write_list(dir: &Path, entries: &[&str]) -> PathBuf {
    let path = dir.join("list.txt");
    let mut text = String::new();
    for e in entries {
        text.push_str(e);
        text.push('\n');
    }
    std::fs::write(&path, text).unwrap();
    path
}
