//! Platform-specific resource limits for the local strategy

use tokio::process::Command;

/// Thread-pool variables pinned to one thread so per-thread arenas made by the
/// numeric libraries stay small under the data-segment limit
pub const SINGLE_THREAD_ENV: &[(&str, &str)] = &[
    ("OPENBLAS_NUM_THREADS", "1"),
    ("OMP_NUM_THREADS", "1"),
    ("MKL_NUM_THREADS", "1"),
    ("NUMEXPR_NUM_THREADS", "1"),
];

/// Cap the child's data segment (heap and private anonymous mappings) at `max_memory_bytes`
///
/// `RLIMIT_AS` would also count the shared libraries and reserved-but-untouched
/// mappings of numpy and scipy, which alone can exceed a few hundred megabytes.
#[cfg(unix)]
pub(super) fn apply_memory_limit(cmd: &mut Command, max_memory_bytes: u64) {
    // SAFETY: pre_exec runs between fork() and exec() in the child process.
    // The closure only calls setrlimit, which is async-signal-safe, and captures a
    // Copy value. The parent's limits are untouched.
    unsafe {
        cmd.pre_exec(move || {
            let limit = libc::rlimit {
                rlim_cur: max_memory_bytes as libc::rlim_t,
                rlim_max: max_memory_bytes as libc::rlim_t,
            };
            if libc::setrlimit(libc::RLIMIT_DATA, &limit) != 0 {
                return Err(std::io::Error::last_os_error());
            }
            Ok(())
        });
    }
}

/// Best effort on non-Unix platforms: no memory ceiling is applied
#[cfg(not(unix))]
pub(super) fn apply_memory_limit(_cmd: &mut Command, _max_memory_bytes: u64) {
    tracing::debug!("memory limit not enforced on this platform");
}
