//! Linear back-off retry for HotPepper requests.
//!
//! [`retry_with_backoff`] re-runs an operation only when its failure maps to a
//! transient [`ErrorCode`](gourmet_core::ErrorCode): network failure, timeout
//! or 5xx. Everything else, including 4xx responses and malformed bodies, is
//! returned on first sight.

use std::future::Future;
use std::time::Duration;

use crate::error::HotpepperError;

/// Returns `true` for errors worth another attempt.
pub(crate) fn is_retriable(err: &HotpepperError) -> bool {
    err.code().is_transient()
}

/// Runs `operation` with up to `max_retries` additional attempts.
///
/// The operation receives the zero-based attempt number. The sleep before
/// retry `n` (1-based) is `base_delay × n`, so with the default 250 ms the
/// first retry waits 250 ms and a second would wait 500 ms.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    base_delay: Duration,
    mut operation: F,
) -> Result<T, HotpepperError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, HotpepperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = base_delay.saturating_mul(attempt);
                tracing::warn!(
                    category = "API",
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "HotPepper transient error, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
