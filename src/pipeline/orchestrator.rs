use anyhow::{Result, anyhow};
use log::debug;
use std::io::BufRead;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crate::engine::progress::spawn_progress_listener;
use crate::engine::transfer::TransferEngine;
use crate::{JobFactory, RunState, RunSummary};

use super::context::PipelineTuning;
use super::lifecycle::{RunStateTracker, StartupBarrier};
use super::queue::BoundedJobQueue;
use super::source::spawn_source_thread;
use super::workers::{WorkerReport, spawn_workers};

/// Run one whole lifecycle: start the pool, feed it from `list`, wait for the drain, join everything.
///
/// Idle → Starting (workers spawned one by one, each ready before the next) → Running (source
/// thread feeding the queue) → Draining (source signaled end) → Stopped (queue empty and ended)
/// → Joined.
pub fn run_pipeline<R>(
    engine: TransferEngine,
    factory: JobFactory,
    list: R,
    tuning: &PipelineTuning,
    show_progress: bool,
) -> Result<RunSummary>
where
    R: BufRead + Send + 'static,
{
    let started = Instant::now();
    let mut state = RunStateTracker::default();

    let queue = Arc::new(BoundedJobQueue::new(tuning.queue_capacity)?);
    let engine = Arc::new(engine);
    let barrier = Arc::new(StartupBarrier::new());
    let (progress_tx, progress_handle) = match show_progress {
        true => {
            let (tx, handle) = spawn_progress_listener("Jobs");
            (Some(tx), Some(handle))
        }
        false => (None, None),
    };

    state.advance(RunState::Starting);
    let mut worker_handles = Vec::new();
    let spawned = spawn_workers(
        tuning.num_workers,
        &queue,
        &engine,
        &barrier,
        progress_tx.as_ref(),
        &mut worker_handles,
    );
    if let Err(e) = spawned {
        queue.signal_end();
        join_workers(worker_handles)?;
        return Err(e);
    }
    debug!("{} worker(s) ready", barrier.ready());

    state.advance(RunState::Running);
    let source_handle = match spawn_source_thread(list, factory, Arc::clone(&queue)) {
        Ok(handle) => handle,
        Err(e) => {
            queue.signal_end();
            join_workers(worker_handles)?;
            return Err(e);
        }
    };

    let produced = match source_handle.join() {
        Ok(n) => n,
        Err(_) => {
            queue.signal_end();
            join_workers(worker_handles)?;
            return Err(anyhow!("source thread panicked"));
        }
    };
    state.advance(RunState::Draining);

    let stopped = queue.wait_drained();
    debug!("queue drained ({} worker(s) already stopped)", stopped);
    state.advance(RunState::Stopped);

    let reports = join_workers(worker_handles)?;
    drop(progress_tx);
    if let Some(handle) = progress_handle {
        let _ = handle.join();
    }
    state.advance(RunState::Joined);

    let mut summary = RunSummary {
        state: state.state(),
        workers: reports.len(),
        produced,
        transferred: 0,
        skipped: 0,
        reported: 0,
        bytes: 0,
        failed: Vec::new(),
        elapsed: started.elapsed(),
    };
    for report in reports {
        summary.transferred += report.transferred;
        summary.skipped += report.skipped;
        summary.reported += report.reported;
        summary.bytes += report.bytes;
        summary.failed.extend(report.failed);
    }
    Ok(summary)
}

/// Join every worker. Only valid once the queue has been ended, or the join never returns.
fn join_workers(handles: Vec<JoinHandle<WorkerReport>>) -> Result<Vec<WorkerReport>> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut panicked = 0_usize;
    for h in handles {
        match h.join() {
            Ok(report) => reports.push(report),
            Err(_) => panicked += 1,
        }
    }
    if panicked > 0 {
        return Err(anyhow!("{} worker thread(s) panicked", panicked));
    }
    Ok(reports)
}
