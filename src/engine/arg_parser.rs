use clap::Parser;
use std::path::PathBuf;

use crate::JobKind;

/// Copy a list of objects between a storage backend and a local cache, or report their block placement.
#[derive(Clone, Debug, Parser)]
#[command(name = "cachecp")]
#[command(about = "Parallel list-driven copy between a storage backend and a local cache.")]
pub struct Cli {
    /// pull: backend -> cache. push: cache -> backend. stat: print block placement.
    #[arg(value_enum, value_name = "ACTION")]
    pub action: JobKind,

    /// Backend directory the listed paths are relative to.
    #[arg(value_name = "REMOTE_ROOT")]
    pub remote_root: PathBuf,

    /// Text file with one relative path per line.
    #[arg(value_name = "LIST_FILE")]
    pub list_file: PathBuf,

    /// Local cache directory the listed paths are relative to.
    #[arg(value_name = "LOCAL_ROOT")]
    pub local_root: PathBuf,

    /// Backend endpoint. Default: CACHECP_ENDPOINT, then `.cachecp.toml`, then `/`.
    #[arg(long, short = 'e')]
    pub endpoint: Option<String>,

    /// Number of worker threads. Default: 3 per available core.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Jobs buffered between the list reader and the workers.
    #[arg(long, short = 'q', value_parser = clap::value_parser!(u64).range(1..))]
    pub queue_capacity: Option<u64>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
