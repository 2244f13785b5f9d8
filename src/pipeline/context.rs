//! Pipeline tuning: worker count and queue capacity derived from options and the host.

use log::debug;

use crate::RunOpts;
use crate::utils::config::WorkerThreadLimits;
use crate::utils::fd_limit::cap_workers_by_fd_limit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    pub num_workers: usize,
    pub queue_capacity: usize,
}

impl PipelineTuning {
    /// Worker count: explicit override, else `workers_per_core` × available threads; always capped
    /// by the FD limit and at least one.
    pub fn from_opts(opts: &RunOpts) -> Self {
        let requested = opts.num_workers.unwrap_or_else(|| {
            WorkerThreadLimits::current().pool_size(opts.workers_per_core)
        });
        let num_workers = cap_workers_by_fd_limit(requested).max(WorkerThreadLimits::FLOOR_WORKERS);
        debug!(
            "Workers: {} (requested {}), queue capacity: {}",
            num_workers, requested, opts.queue_capacity
        );
        Self {
            num_workers,
            queue_capacity: opts.queue_capacity,
        }
    }
}
