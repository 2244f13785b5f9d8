//! Engine module: transfer logic, job handlers and the CLI front end

pub mod arg_parser;
pub mod cli;
pub mod handlers;
pub mod locality;
pub mod progress;
pub mod tools;
pub mod transfer;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use locality::{JsonLinesSink, LocalityRecord, RecordSink};
pub use tools::{MtimeOrder, compare_mtime, join_rel, local_hostname};
pub use transfer::{TransferEngine, copy, drain, fill};
