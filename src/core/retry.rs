//! Write-conflict retry combinator
//!
//! Catalog DDL runs under optimistic concurrency: an attempt that observes a
//! structural change underneath itself is discarded wholesale and re-run.
//! The loop is unbounded; total latency is bounded by the invoking request's
//! own deadline, which is not this layer's concern.

use crate::core::error::DbResult;

/// Run `attempt` until it returns something other than a write conflict.
///
/// Conflicts are invisible to the caller except as latency; any other error
/// terminates the loop immediately.
pub fn with_write_conflict_retry<T, F>(op: &str, namespace: &str, mut attempt: F) -> DbResult<T>
where
    F: FnMut() -> DbResult<T>,
{
    let mut attempts: u64 = 0;
    loop {
        attempts += 1;
        match attempt() {
            Err(err) if err.is_write_conflict() => {
                log::debug!(
                    "write conflict during {} on {}, retrying (attempt {}): {}",
                    op,
                    namespace,
                    attempts,
                    err
                );
            }
            result => return result,
        }
    }
}
