//! Public and internal types for the cachecp API and pipeline.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::engine::tools::join_rel;
use crate::utils::config::{DEFAULT_ENDPOINT, QueueConsts, TransferConsts, WorkerThreadLimits};

/// What every job of a run does. Decided once at startup and carried on each [`Job`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum JobKind {
    /// Backend → local cache.
    #[value(alias = "hdfs2local")]
    Pull,
    /// Local cache → backend.
    #[value(alias = "local2hdfs")]
    Push,
    /// Report block placement for the backend object.
    #[value(alias = "stats4hdfs")]
    Stat,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Pull => "pull",
            JobKind::Push => "push",
            JobKind::Stat => "stat",
        }
    }
}

/// One unit of work: a single listed path plus the run's kind, with both ends resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Job {
    pub kind: JobKind,
    /// Path as it appeared in the list file.
    pub rel_path: PathBuf,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Builds jobs for one run from the two roots.
#[derive(Clone, Debug)]
pub struct JobFactory {
    pub kind: JobKind,
    pub remote_root: PathBuf,
    pub local_root: PathBuf,
}

impl JobFactory {
    pub fn new(kind: JobKind, remote_root: &Path, local_root: &Path) -> Self {
        Self {
            kind,
            remote_root: remote_root.to_path_buf(),
            local_root: local_root.to_path_buf(),
        }
    }

    /// Resolve `rel` against both roots. Push reads locally and writes to the backend;
    /// Pull and Stat read from the backend.
    pub fn job(&self, rel: impl AsRef<Path>) -> Job {
        let rel = rel.as_ref();
        let remote = join_rel(&self.remote_root, rel);
        let local = join_rel(&self.local_root, rel);
        let (source, destination) = match self.kind {
            JobKind::Pull | JobKind::Stat => (remote, local),
            JobKind::Push => (local, remote),
        };
        Job {
            kind: self.kind,
            rel_path: rel.to_path_buf(),
            source,
            destination,
        }
    }
}

/// Lifecycle of one run. `Joined` is terminal; there is no way back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Idle,
    Starting,
    Running,
    Draining,
    Stopped,
    Joined,
}

/// What a handler did with one job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobOutcome {
    /// Bytes copied from source to destination.
    Transferred(u64),
    /// Local copy is newer than the backend object; nothing was read or written.
    Skipped,
    /// A locality record was emitted.
    Reported,
}

/// Totals for a finished run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub state: RunState,
    pub workers: usize,
    pub produced: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub reported: usize,
    pub bytes: u64,
    /// (source path, error message) for every job that failed.
    pub failed: Vec<(PathBuf, String)>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.transferred + self.skipped + self.reported
    }
}

/// Full options (CLI and lib).
#[derive(Clone, Debug)]
pub struct RunOpts {
    pub kind: JobKind,
    /// Backend directory holding the listed objects.
    pub remote_root: PathBuf,
    /// Local cache directory.
    pub local_root: PathBuf,
    /// Backend endpoint passed to `connect`.
    pub endpoint: String,
    /// Override worker count. When None, `workers_per_core` × available threads.
    pub num_workers: Option<usize>,
    pub workers_per_core: usize,
    pub queue_capacity: usize,
    pub buffer_size: usize,
    /// Length of the range queried for block placement.
    pub block_size: u64,
    /// Debug logging and a progress counter.
    pub verbose: bool,
}

impl RunOpts {
    pub fn new(kind: JobKind, remote_root: &Path, local_root: &Path) -> Self {
        Self {
            kind,
            remote_root: remote_root.to_path_buf(),
            local_root: local_root.to_path_buf(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            num_workers: None,
            workers_per_core: WorkerThreadLimits::WORKERS_PER_CORE,
            queue_capacity: QueueConsts::DEFAULT_CAPACITY,
            buffer_size: TransferConsts::BUFFER_SIZE,
            block_size: TransferConsts::BLOCK_SIZE,
            verbose: false,
        }
    }

    pub fn job_factory(&self) -> JobFactory {
        JobFactory::new(self.kind, &self.remote_root, &self.local_root)
    }
}
