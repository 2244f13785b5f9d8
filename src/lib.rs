//! cachecp: parallel list-driven copy between a storage backend and a local cache

pub mod backend;
pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::path::Path;
use std::sync::Arc;

use backend::{Backend, Store};
use engine::{RecordSink, TransferEngine};
use pipeline::PipelineTuning;

/// Result alias used by public cachecp API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: run every path listed in `list_path` through the worker pool.
///
/// The list file is opened before any thread starts, so a missing list fails the whole run
/// and no job executes. Individual job failures do not fail the run; they are returned in
/// [`RunSummary::failed`]. `backend` is shared by all workers and must support concurrent use.
pub fn sync_list(
    backend: Arc<dyn Backend>,
    local: Arc<dyn Store>,
    sink: Arc<dyn RecordSink>,
    opts: &RunOpts,
    list_path: &Path,
) -> Result<RunSummary> {
    anyhow::ensure!(opts.buffer_size > 0, "buffer_size must be at least 1 byte");
    let list = pipeline::open_list(list_path)?;
    let tuning = PipelineTuning::from_opts(opts);
    let engine = TransferEngine::new(backend, local, sink)
        .with_buffer_size(opts.buffer_size)
        .with_block_size(opts.block_size);
    debug!(
        "{} {} -> {} ({} worker(s), queue {})",
        opts.kind.as_str(),
        opts.remote_root.display(),
        opts.local_root.display(),
        tuning.num_workers,
        tuning.queue_capacity
    );
    pipeline::run_pipeline(engine, opts.job_factory(), list, &tuning, opts.verbose)
}
