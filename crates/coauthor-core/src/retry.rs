//! Retry with exponential backoff

use std::fmt::Display;
use std::time::Duration;

/// Exponential backoff: 2^attempt seconds (1s, 2s, 4s, ...) for 0-based attempts
pub const fn backoff_duration(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Retry a fallible operation with exponential backoff.
///
/// Runs `attempt_fn` at most `max_attempts` times (at least once). After a
/// failed attempt `n` that is not the last, logs the failure and calls
/// `sleep(backoff_duration(n))`. Every error is treated as retryable.
///
/// Returns `Ok(T)` on first success, or the final `Err` on exhaustion.
pub fn retry_with_backoff<T, E: Display>(
    label: &str,
    max_attempts: u32,
    mut attempt_fn: impl FnMut(u32) -> Result<T, E>,
    sleep: impl Fn(Duration),
) -> Result<T, E> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0u32;
    loop {
        match attempt_fn(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt + 1 < max_attempts => {
                let wait = backoff_duration(attempt);
                log::warn!(
                    "{label}: attempt {}/{max_attempts} failed: {e}, retrying in {}s",
                    attempt + 1,
                    wait.as_secs()
                );
                sleep(wait);
                attempt += 1;
            }
            Err(e) => {
                log::error!("{label}: failed after {max_attempts} attempts: {e}");
                return Err(e);
            }
        }
    }
}
