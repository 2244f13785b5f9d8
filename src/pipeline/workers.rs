use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::JobOutcome;
use crate::engine::transfer::TransferEngine;

use super::lifecycle::StartupBarrier;
use super::queue::{BoundedJobQueue, Dequeued};

/// What one worker did, handed back through its join handle.
#[derive(Debug, Default)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub transferred: usize,
    pub skipped: usize,
    pub reported: usize,
    pub bytes: u64,
    pub failed: Vec<(PathBuf, String)>,
}

impl WorkerReport {
    fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Transferred(bytes) => {
                self.transferred += 1;
                self.bytes += bytes;
            }
            JobOutcome::Skipped => self.skipped += 1,
            JobOutcome::Reported => self.reported += 1,
        }
    }
}

/// Single worker: announce readiness, then dequeue and execute until end of stream.
/// Job errors are logged and kept in the report; they never stop the loop.
fn worker_loop(
    worker_id: usize,
    queue: Arc<BoundedJobQueue>,
    engine: Arc<TransferEngine>,
    barrier: Arc<StartupBarrier>,
    progress: Option<Sender<usize>>,
) -> WorkerReport {
    let mut report = WorkerReport {
        worker_id,
        ..WorkerReport::default()
    };
    barrier.announce_ready();

    while let Dequeued::Item(job) = queue.dequeue() {
        match engine.execute(&job) {
            Ok(outcome) => report.record(outcome),
            Err(e) => {
                warn!("{} {}: {:#}", job.kind.as_str(), job.rel_path.display(), e);
                report.failed.push((job.source, format!("{:#}", e)));
            }
        }
        if let Some(tx) = &progress {
            let _ = tx.send(1);
        }
    }

    queue.worker_stopped();
    debug!("worker {} stopped", worker_id);
    report
}

/// Spawn `num_workers` workers one at a time into `handles`, waiting for each to announce
/// readiness before spawning the next. On success the whole pool is waiting on the queue.
/// On error, `handles` still holds the workers already started so the caller can end and join them.
pub fn spawn_workers(
    num_workers: usize,
    queue: &Arc<BoundedJobQueue>,
    engine: &Arc<TransferEngine>,
    barrier: &Arc<StartupBarrier>,
    progress: Option<&Sender<usize>>,
    handles: &mut Vec<JoinHandle<WorkerReport>>,
) -> Result<()> {
    handles.reserve(num_workers);
    for worker_id in 0..num_workers {
        let queue = Arc::clone(queue);
        let engine = Arc::clone(engine);
        let worker_barrier = Arc::clone(barrier);
        let progress = progress.cloned();
        let handle = thread::Builder::new()
            .name(format!("{}-worker-{}", env!("CARGO_PKG_NAME"), worker_id))
            .spawn(move || worker_loop(worker_id, queue, engine, worker_barrier, progress))
            .with_context(|| format!("spawn worker {}", worker_id))?;
        barrier.wait_for(worker_id + 1);
        handles.push(handle);
    }
    Ok(())
}
