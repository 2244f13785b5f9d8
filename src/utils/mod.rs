pub mod cachecp_toml;
pub mod config;
pub mod fd_limit;
pub mod logger;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, cap_workers_by_fd_limit, soft_fd_limit, workers_within_fd_budget};
pub use logger::setup_logging;
