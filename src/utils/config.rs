//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    endpoint_env: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                endpoint_env: format!("{}_ENDPOINT", pkg.to_uppercase()),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Optional settings file looked up in the working directory.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable that supplies the backend endpoint (e.g. `CACHECP_ENDPOINT`).
    pub fn endpoint_env(&self) -> &str {
        &self.endpoint_env
    }
}

/// Backend endpoint when none is configured: backend paths are resolved from the filesystem root.
pub const DEFAULT_ENDPOINT: &str = "/";

// ---- Worker threads ----

/// Worker pool sizing.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Floor for the pool size.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_WORKERS,
        }
    }
}

impl WorkerThreadLimits {
    /// Transfers mostly wait on I/O, so the pool oversubscribes the cores.
    pub const WORKERS_PER_CORE: usize = 3;
    pub const FLOOR_WORKERS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Pool size for `per_core` workers on each available thread, never below the floor.
    pub fn pool_size(&self, per_core: usize) -> usize {
        self.all_threads
            .saturating_mul(per_core)
            .max(self.floor)
    }
}

// ---- Queue ----

pub struct QueueConsts;

impl QueueConsts {
    /// Jobs held between the list reader and the workers. Bounds memory regardless of list size.
    pub const DEFAULT_CAPACITY: usize = 128;
}

// ---- Transfer ----

/// Copy buffer and placement query sizes.
pub struct TransferConsts;

impl TransferConsts {
    /// Intermediate buffer for each copy (bytes). 128 KiB.
    pub const BUFFER_SIZE: usize = 128 * 1024;
    /// Range length asked for when querying block placement (bytes). 64 MiB.
    pub const BLOCK_SIZE: u64 = 64 * 1024 * 1024;
}

// ---- Stat output ----

/// Separator placed before every hostname in a locality record.
pub const HOSTNAME_DELIMITER: char = '+';
