//! Buffered stream copy and the per-job transfer engine.

use anyhow::Result;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::backend::{Backend, Store};
use crate::engine::handlers;
use crate::engine::locality::RecordSink;
use crate::engine::tools::local_hostname;
use crate::utils::config::TransferConsts;
use crate::{Job, JobKind, JobOutcome};

/// Read into `buf` until it is full or `source` reports end of stream.
/// Returns the bytes filled; less than `buf.len()` means the source is exhausted.
pub fn fill<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Write all of `buf` to `dest`, accumulating partial writes.
pub fn drain<W: Write + ?Sized>(dest: &mut W, buf: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < buf.len() {
        match dest.write(&buf[written..]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "destination accepted no bytes",
                ));
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Copy `source` to `dest` through `buf`. Returns the total bytes copied.
pub fn copy<R, W>(source: &mut R, dest: &mut W, buf: &mut [u8]) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut total = 0_u64;
    loop {
        let n = fill(source, buf)?;
        drain(dest, &buf[..n])?;
        total += n as u64;
        if n < buf.len() {
            return Ok(total);
        }
    }
}

/// Everything a worker needs to execute jobs. Shared by all workers of a run.
pub struct TransferEngine {
    pub backend: Arc<dyn Backend>,
    pub local: Arc<dyn Store>,
    pub sink: Arc<dyn RecordSink>,
    pub buffer_size: usize,
    pub block_size: u64,
    /// Compared against the first block's host by Stat jobs.
    pub hostname: String,
}

impl TransferEngine {
    pub fn new(
        backend: Arc<dyn Backend>,
        local: Arc<dyn Store>,
        sink: Arc<dyn RecordSink>,
    ) -> Self {
        Self {
            backend,
            local,
            sink,
            buffer_size: TransferConsts::BUFFER_SIZE,
            block_size: TransferConsts::BLOCK_SIZE,
            hostname: local_hostname(),
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    /// Run one job to completion or to its first error.
    pub fn execute(&self, job: &Job) -> Result<JobOutcome> {
        match job.kind {
            JobKind::Pull => handlers::pull(self, &job.source, &job.destination),
            JobKind::Push => handlers::push(self, &job.source, &job.destination),
            JobKind::Stat => handlers::stat(self, &job.source),
        }
    }

    /// Copy between two opened streams with a fresh buffer of `buffer_size`.
    pub(crate) fn copy_stream(&self, source: &mut dyn Read, dest: &mut dyn Write) -> io::Result<u64> {
        let mut buf = vec![0u8; self.buffer_size];
        copy(source, dest, &mut buf)
    }

    pub(crate) fn ensure_local_parent(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.local.ensure_dir(parent);
        }
    }

    pub(crate) fn ensure_backend_parent(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.backend.create_directory_recursive(parent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most `step` bytes per read and interrupts every other call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
        calls: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    /// Accepts at most `step` bytes per write.
    struct Narrow {
        out: Vec<u8>,
        step: usize,
    }

    impl Write for Narrow {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len());
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk gone"))
        }
    }

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn fill_absorbs_short_and_interrupted_reads() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut src = Trickle {
            data: &data,
            step: 7,
            calls: 0,
        };
        let mut buf = [0u8; 64];
        assert_eq!(fill(&mut src, &mut buf).unwrap(), 64);
        assert_eq!(&buf[..], &data[..64]);
        assert_eq!(fill(&mut src, &mut buf).unwrap(), 36);
        assert_eq!(fill(&mut src, &mut buf).unwrap(), 0);
    }

    #[test]
    fn drain_accumulates_partial_writes() {
        let mut dest = Narrow {
            out: Vec::new(),
            step: 3,
        };
        drain(&mut dest, b"hello world").unwrap();
        assert_eq!(dest.out, b"hello world");
    }

    #[test]
    fn copy_stops_on_short_fill() {
        let data = vec![9u8; 250];
        let mut src = Trickle {
            data: &data,
            step: 33,
            calls: 0,
        };
        let mut dest = Narrow {
            out: Vec::new(),
            step: 50,
        };
        let mut buf = [0u8; 100];
        assert_eq!(copy(&mut src, &mut dest, &mut buf).unwrap(), 250);
        assert_eq!(dest.out, data);
    }

    #[test]
    fn copy_propagates_read_and_write_errors() {
        let mut buf = [0u8; 16];
        let mut sink = Vec::new();
        assert!(copy(&mut Broken, &mut sink, &mut buf).is_err());
        let mut src: &[u8] = b"data";
        assert!(copy(&mut src, &mut Broken, &mut buf).is_err());
    }

    #[test]
    fn drain_rejects_zero_length_write() {
        let mut dest = Narrow {
            out: Vec::new(),
            step: 0,
        };
        let err = drain(&mut dest, b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }
}
