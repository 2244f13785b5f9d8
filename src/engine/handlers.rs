//! Job-kind handlers: pull (backend → local), push (local → backend), stat (block placement).

use anyhow::{Context, Result, anyhow};
use log::debug;
use std::io::Write;
use std::path::Path;

use crate::JobOutcome;
use crate::backend::is_not_found;
use crate::engine::locality::LocalityRecord;
use crate::engine::tools::{MtimeOrder, compare_mtime};
use crate::engine::transfer::TransferEngine;

/// Copy backend `source` to local `dest`, unless the local copy is strictly newer.
pub fn pull(engine: &TransferEngine, source: &Path, dest: &Path) -> Result<JobOutcome> {
    let remote = engine
        .backend
        .stat(source)
        .with_context(|| format!("stat backend {}", source.display()))?;
    let local_mtime = match engine.local.stat(dest) {
        Ok(st) => Some(st.modified),
        Err(e) if is_not_found(&e) => None,
        Err(e) => {
            debug!("stat {}: {}; copying anyway", dest.display(), e);
            None
        }
    };
    if compare_mtime(local_mtime, remote.modified) == MtimeOrder::Newer {
        debug!("skip {}: local copy is newer", dest.display());
        return Ok(JobOutcome::Skipped);
    }

    let mut reader = engine
        .backend
        .open_read(source)
        .with_context(|| format!("open backend {} for reading", source.display()))?;
    engine.ensure_local_parent(dest);
    let mut writer = engine
        .local
        .open_write(dest)
        .with_context(|| format!("create {}", dest.display()))?;

    debug!("pull {} -> {}", source.display(), dest.display());
    let copied = engine
        .copy_stream(&mut reader, &mut writer)
        .and_then(|bytes| writer.flush().map(|()| bytes));
    drop(writer);
    match copied {
        Ok(bytes) => Ok(JobOutcome::Transferred(bytes)),
        Err(e) => {
            // A partial file would look newer than the backend object on the next run.
            if let Err(rm) = engine.local.remove_file(dest) {
                debug!("remove partial {}: {}", dest.display(), rm);
            }
            Err(e).with_context(|| format!("copy {} -> {}", source.display(), dest.display()))
        }
    }
}

/// Copy local `source` to backend `dest`. The local file must exist.
pub fn push(engine: &TransferEngine, source: &Path, dest: &Path) -> Result<JobOutcome> {
    let mut reader = engine
        .local
        .open_read(source)
        .with_context(|| format!("open {} for reading", source.display()))?;
    engine.ensure_backend_parent(dest);
    let mut writer = engine
        .backend
        .open_write(dest)
        .with_context(|| format!("create backend {}", dest.display()))?;

    debug!("push {} -> {}", source.display(), dest.display());
    let bytes = engine
        .copy_stream(&mut reader, &mut writer)
        .with_context(|| format!("copy {} -> {}", source.display(), dest.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush backend {}", dest.display()))?;
    Ok(JobOutcome::Transferred(bytes))
}

/// Query where the first block of `source` lives and emit one locality record.
pub fn stat(engine: &TransferEngine, source: &Path) -> Result<JobOutcome> {
    let blocks = engine
        .backend
        .get_block_locations(source, 0, engine.block_size)
        .with_context(|| format!("get block locations for {}", source.display()))?;
    let name = source.to_string_lossy();
    let record = LocalityRecord::from_blocks(&name, &engine.hostname, &blocks)
        .ok_or_else(|| anyhow!("no block locations reported for {}", source.display()))?;
    engine
        .sink
        .emit(&record)
        .context("write locality record")?;
    Ok(JobOutcome::Reported)
}
