//! Load `.cachecp.toml` from a directory (CLI only). Lib callers pass [`RunOpts`] directly.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::RunOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CachecpToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    endpoint: Option<String>,
    workers: Option<usize>,
    workers_per_core: Option<usize>,
    queue_capacity: Option<usize>,
    buffer_size: Option<usize>,
    block_size: Option<u64>,
    verbose: Option<bool>,
}

/// Load the settings file from `dir`. `Ok(None)` when there is no file; a file that cannot be
/// read or parsed is an error, so a typo never silently drops every setting.
pub(crate) fn load_cachecp_toml(dir: &Path) -> Result<Option<CachecpToml>> {
    let path = dir.join(PackagePaths::get().config_filename());
    if !path.is_file() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    let file = parse_cachecp_toml(&s)
        .with_context(|| format!("invalid settings file {}", path.display()))?;
    Ok(Some(file))
}

pub(crate) fn parse_cachecp_toml(s: &str) -> std::result::Result<CachecpToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before env and CLI.
pub(crate) fn apply_file_to_opts(file: &CachecpToml, opts: &mut RunOpts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, endpoint => endpoint);
    if sec.workers.is_some() {
        opts.num_workers = sec.workers;
    }
    apply_file_opt!(sec, opts, workers_per_core => workers_per_core);
    apply_file_opt!(sec, opts, queue_capacity => queue_capacity);
    apply_file_opt!(sec, opts, buffer_size => buffer_size);
    apply_file_opt!(sec, opts, block_size => block_size);
    apply_file_opt!(sec, opts, verbose => verbose);
}
