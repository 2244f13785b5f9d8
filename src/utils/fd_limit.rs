//! Worker pool cap derived from the process open-file limit (Unix only).

use log::debug;

/// Descriptors one worker holds at once: the source stream, the destination stream, and two
/// spares for backend bookkeeping.
pub const FDS_PER_WORKER: usize = 4;

/// Share of the soft limit the pool may consume, in percent.
const FD_BUDGET_PERCENT: u64 = 80;

/// Soft `RLIMIT_NOFILE`, or `None` when unlimited or unavailable.
#[cfg(unix)]
pub fn soft_fd_limit() -> Option<u64> {
    let mut rlim = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut rlim) } != 0 {
        return None;
    }
    match rlim.rlim_cur {
        libc::RLIM_INFINITY => None,
        cur => Some(cur as u64),
    }
}

#[cfg(not(unix))]
pub fn soft_fd_limit() -> Option<u64> {
    None
}

/// Workers that fit in the descriptor budget; at least one. `None` when there is no limit.
pub fn workers_within_fd_budget() -> Option<usize> {
    let budget = soft_fd_limit()?.saturating_mul(FD_BUDGET_PERCENT) / 100;
    let budget = usize::try_from(budget).unwrap_or(usize::MAX);
    Some((budget / FDS_PER_WORKER).max(1))
}

/// Cap `requested` workers by the descriptor budget.
pub fn cap_workers_by_fd_limit(requested: usize) -> usize {
    match workers_within_fd_budget() {
        Some(cap) if cap < requested => {
            debug!("Capping workers {} -> {} (open-file limit)", requested, cap);
            cap
        }
        _ => requested,
    }
}
