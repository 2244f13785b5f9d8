//! Job source: read the list file and feed the queue.

use anyhow::{Context, Result};
use log::{debug, error};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::JobFactory;
use crate::engine::tools::{path_from_bytes, trim_line_ending};

use super::queue::BoundedJobQueue;

/// Open the list file. Failure here is fatal for the run.
pub fn open_list(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("open list file {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Enqueue one job per non-empty line, then signal end of stream. Returns the number of jobs produced.
/// Lines are taken as raw bytes, so paths need not be UTF-8. A read error ends the list early;
/// jobs already queued still run.
pub fn run_source_loop<R: BufRead>(
    mut reader: R,
    factory: &JobFactory,
    queue: &BoundedJobQueue,
) -> usize {
    let mut count = 0_usize;
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => {
                let rel = trim_line_ending(&line);
                if rel.is_empty() {
                    continue;
                }
                queue.enqueue(factory.job(path_from_bytes(rel)));
                count += 1;
            }
            Err(e) => {
                error!("reading list stopped after {} entries: {}", count, e);
                break;
            }
        }
    }
    queue.signal_end();
    debug!("source: {} job(s) queued, end of stream signaled", count);
    count
}

pub fn spawn_source_thread<R>(
    reader: R,
    factory: JobFactory,
    queue: Arc<BoundedJobQueue>,
) -> Result<JoinHandle<usize>>
where
    R: BufRead + Send + 'static,
{
    thread::Builder::new()
        .name(format!("{}-source", env!("CARGO_PKG_NAME")))
        .spawn(move || run_source_loop(reader, &factory, &queue))
        .context("spawn source thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobKind;
    use crate::pipeline::queue::Dequeued;
    use std::io::Cursor;
    use std::path::PathBuf;

    #[test]
    fn skips_blank_lines_and_signals_end() {
        let queue = BoundedJobQueue::new(8).unwrap();
        let factory = JobFactory::new(JobKind::Pull, Path::new("/remote"), Path::new("/cache"));
        let list = Cursor::new("a.bin\n\nsub/b.bin\r\nc.bin");
        assert_eq!(run_source_loop(list, &factory, &queue), 3);
        assert!(queue.is_ended());

        let mut got = Vec::new();
        while let Dequeued::Item(job) = queue.dequeue() {
            got.push(job);
        }
        assert_eq!(got.len(), 3);
        assert_eq!(got[1].rel_path, PathBuf::from("sub/b.bin"));
        assert_eq!(got[1].source, PathBuf::from("/remote/sub/b.bin"));
        assert_eq!(got[1].destination, PathBuf::from("/cache/sub/b.bin"));
        assert_eq!(got[2].rel_path, PathBuf::from("c.bin"));
    }

    #[test]
    fn non_utf8_line_does_not_end_the_list() {
        let queue = BoundedJobQueue::new(8).unwrap();
        let factory = JobFactory::new(JobKind::Pull, Path::new("/remote"), Path::new("/cache"));
        let list = Cursor::new(b"a\n\xffbad\nb\nc\n".to_vec());
        assert_eq!(run_source_loop(list, &factory, &queue), 4);

        let mut got = Vec::new();
        while let Dequeued::Item(job) = queue.dequeue() {
            got.push(job.rel_path);
        }
        assert_eq!(got[0], PathBuf::from("a"));
        assert_eq!(got[2], PathBuf::from("b"));
        assert_eq!(got[3], PathBuf::from("c"));
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            assert_eq!(got[1].as_os_str().as_bytes(), b"\xffbad");
        }
    }

    #[test]
    fn push_jobs_read_locally() {
        let queue = BoundedJobQueue::new(1).unwrap();
        let factory = JobFactory::new(JobKind::Push, Path::new("/remote"), Path::new("/cache"));
        run_source_loop(Cursor::new("x\n"), &factory, &queue);
        match queue.dequeue() {
            Dequeued::Item(job) => {
                assert_eq!(job.source, PathBuf::from("/cache/x"));
                assert_eq!(job.destination, PathBuf::from("/remote/x"));
            }
            Dequeued::EndOfStream => panic!("expected a job"),
        }
    }

    #[test]
    fn missing_list_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_list(&dir.path().join("absent.txt")).is_err());
    }
}
