//! Retry policy: re-invoke a fallible operation up to N times with a fixed
//! delay between attempts.
//!
//! Intermediate failures are swallowed (logged at warn); the final failure
//! is surfaced unchanged, with no wrapping. Whether a fresh connection is
//! opened per attempt or one connection is reused across attempts is the
//! caller's choice — this policy only re-invokes the closure it was given.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use crate::error::Result;

/// Invoke `op` up to `max_attempts` times (including the first), sleeping
/// `delay` between failed attempts. Success on any attempt short-circuits;
/// once all attempts have failed, the most recent error is returned as-is.
///
/// `max_attempts` of 0 is treated as 1: the operation always runs at least
/// once.
pub async fn with_retry<T, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < attempts => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "attempt failed, retrying after delay"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                warn!(attempts, error = %err, "all attempts failed");
                return Err(err);
            }
        }
    }
}
