use std::path::PathBuf;

/// Log failed jobs after the run: a warning with the count, and each path when verbose.
/// Failures are job-local, so this never turns into an error.
pub fn report_failed_jobs(failed: &[(PathBuf, String)], verbose: bool) {
    if failed.is_empty() {
        return;
    }
    log::warn!("{} job(s) failed", failed.len());
    if verbose {
        for (path, msg) in failed {
            eprintln!("  failed: {} ({})", path.display(), msg);
        }
    }
}
