//! File descriptor limit detection for capping the scan pool (Unix).

/// Descriptors held per scan worker: the open log file plus headroom for listing.
pub const FDS_PER_WORKER: usize = 2;

/// Fraction of the process FD limit to use (leave headroom for logging, the output file, etc.).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    // RLIM_INFINITY is typically !0 or u64::MAX; treat as "no practical limit"
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Suggested max worker count so concurrent open files stay under ~80% of the FD limit.
/// Returns `None` if no limit is available.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    max_open_fds().map(workers_for_fd_limit)
}

fn workers_for_fd_limit(limit: u64) -> usize {
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    (usable / FDS_PER_WORKER).max(1)
}

/// Resolve the pool size: requested or available threads, capped by the FD limit, at least 1.
pub fn cap_workers(requested: usize, fd_cap: Option<usize>) -> usize {
    let n = match fd_cap {
        Some(cap) if cap < requested => {
            log::debug!("Capping workers {} -> {} (FD limit ~80%)", requested, cap);
            cap
        }
        _ => requested,
    };
    n.max(1)
}
