//! CLI command handler: build options from file, env and flags, connect, run.

use anyhow::Result;
use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::backend::{Backend, FsBackend, LocalFs};
use crate::engine::arg_parser::Cli;
use crate::engine::locality::JsonLinesSink;
use crate::utils::cachecp_toml::{apply_file_to_opts, load_cachecp_toml};
use crate::utils::config::PackagePaths;
use crate::utils::setup_logging;
use crate::{RunOpts, RunSummary, pipeline, sync_list};

/// Endpoint from the environment, loading `.env` in `dir` first when present.
fn endpoint_from_env(dir: &Path) -> Option<String> {
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
    }
    std::env::var(PackagePaths::get().endpoint_env())
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Defaults < `.cachecp.toml` < environment < command line. An invalid settings file is fatal.
fn setup_opts(cli: &Cli, cwd: &Path) -> Result<RunOpts> {
    let mut opts = RunOpts::new(cli.action, &cli.remote_root, &cli.local_root);
    if let Some(file) = load_cachecp_toml(cwd)? {
        apply_file_to_opts(&file, &mut opts);
    }
    if let Some(endpoint) = endpoint_from_env(cwd) {
        opts.endpoint = endpoint;
    }
    if let Some(ref endpoint) = cli.endpoint {
        opts.endpoint = endpoint.clone();
    }
    if let Some(n) = cli.workers {
        opts.num_workers = Some(n as usize);
    }
    if let Some(c) = cli.queue_capacity {
        opts.queue_capacity = c as usize;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    Ok(opts)
}

/// Run one transfer or stat pass over the list file.
pub fn handle_run(cli: &Cli) -> Result<RunSummary> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| ".".into());
    let opts = setup_opts(cli, &cwd)?;
    setup_logging(opts.verbose);
    debug!("{} CONFIG:{:#?}", PackagePaths::get().pkg_name().to_uppercase(), opts);

    let backend: Arc<dyn Backend> =
        Arc::new(FsBackend::connect(&opts.endpoint)?.with_block_size(opts.block_size));
    let result = sync_list(
        Arc::clone(&backend),
        Arc::new(LocalFs),
        Arc::new(JsonLinesSink::stdout()),
        &opts,
        &cli.list_file,
    );
    backend.disconnect();
    let summary = result?;

    pipeline::report_failed_jobs(&summary.failed, opts.verbose);
    info!(
        "{} {} job(s) with {} worker(s): {} transferred ({} bytes), {} skipped, {} reported, {} failed",
        opts.kind.as_str(),
        summary.produced,
        summary.workers,
        summary.transferred,
        summary.bytes,
        summary.skipped,
        summary.reported,
        summary.failed.len()
    );
    Ok(summary)
}
