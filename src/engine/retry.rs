//! Retry wrapper for optimistic-concurrency conflicts.

use crate::engine::error::MachineError;

/// Recommended retry budget for optimistic-concurrency callers.
pub const DEFAULT_MAX_RETRIES: usize = 1;

/// Invoke `op`; on [`MachineError::Conflict`] retry up to `max_retries`
/// additional times, then let the last conflict propagate.
///
/// This is the optimistic-concurrency protocol: the engine does not
/// detect conflicts itself - caller-supplied logic (e.g. an
/// optimistic-lock version check inside the transition body) raises
/// [`MachineError::Conflict`], and this wrapper re-invokes the whole
/// closure. The closure must re-read current state and re-validate the
/// transition from scratch on every attempt; no guard results are
/// cached across attempts. Any non-conflict error propagates
/// immediately without retry.
///
/// # Example
///
/// ```rust
/// use machina::engine::{retry_conflicts, MachineError, DEFAULT_MAX_RETRIES};
///
/// let mut attempts = 0;
/// let value = retry_conflicts(DEFAULT_MAX_RETRIES, || {
///     attempts += 1;
///     if attempts == 1 {
///         Err(MachineError::conflict("stale row version"))
///     } else {
///         Ok("checked out")
///     }
/// })?;
///
/// assert_eq!(value, "checked out");
/// assert_eq!(attempts, 2);
/// # Ok::<(), MachineError>(())
/// ```
pub fn retry_conflicts<T, F>(max_retries: usize, mut op: F) -> Result<T, MachineError>
where
    F: FnMut() -> Result<T, MachineError>,
{
    let mut attempt = 0;
    loop {
        match op() {
            Err(err) if err.is_conflict() && attempt < max_retries => attempt += 1,
            result => return result,
        }
    }
}
