//! Retry with exponential back-off and jitter for backend requests.
//!
//! With `max_retries = 0` (the default) every request is attempted once and
//! failures go straight to the caller's fallback handling.

use std::future::Future;
use std::time::Duration;

use crate::error::ApiError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Network timeouts, connection failures and HTTP 5xx are retriable.
/// Backend error envelopes, client errors (4xx), undecodable bodies and bad
/// base URLs are not.
pub(crate) fn is_retriable(err: &ApiError) -> bool {
    match err {
        ApiError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ApiError::Backend(_) | ApiError::Deserialize { .. } | ApiError::InvalidBaseUrl { .. } => {
            false
        }
    }
}

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Delay before retry number `attempt` (1-based), before jitter.
///
/// Doubles from `base_ms` each attempt and saturates at [`MAX_DELAY_MS`].
fn backoff_delay_ms(base_ms: u64, attempt: u32) -> u64 {
    let shift = attempt.saturating_sub(1).min(10);
    base_ms.saturating_mul(1u64 << shift).min(MAX_DELAY_MS)
}

/// Scales `delay_ms` by a random factor in `[0.75, 1.25)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn with_jitter(delay_ms: u64) -> u64 {
    let factor = rand::random_range(0.75..1.25);
    (delay_ms as f64 * factor) as u64
}

/// Calls `operation` until it succeeds, fails permanently, or `max_retries`
/// extra attempts have been spent.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut retries_used = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries_used >= max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries_used += 1;
        let delay_ms = with_jitter(backoff_delay_ms(backoff_base_ms, retries_used));
        tracing::warn!(
            retry = retries_used,
            max_retries,
            delay_ms,
            error = %err,
            "backend request failed, backing off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
