//! Pipeline components: bounded queue, job source, worker pool, lifecycle coordination.

pub mod context;
pub mod error_handler;
pub mod lifecycle;
pub mod orchestrator;
pub mod queue;
pub mod source;
pub mod workers;

pub use context::PipelineTuning;
pub use error_handler::report_failed_jobs;
pub use lifecycle::{RunStateTracker, StartupBarrier};
pub use orchestrator::run_pipeline;
pub use queue::{BoundedJobQueue, Dequeued};
pub use source::{open_list, run_source_loop, spawn_source_thread};
pub use workers::{WorkerReport, spawn_workers};
