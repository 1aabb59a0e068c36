//! Retry with exponential back-off and jitter for the places client.

use std::future::Future;
use std::time::Duration;

use crate::error::PlacesError;

/// Upstream statuses the places API documents as transient.
const TRANSIENT_UPSTREAM_STATUSES: [&str; 1] = ["UNKNOWN_ERROR"];

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// Retries network timeouts, connection failures, 5xx responses and the
/// upstream `UNKNOWN_ERROR` status. Denied or invalid requests, quota
/// statuses and malformed bodies are returned as-is.
pub(crate) fn is_retriable(err: &PlacesError) -> bool {
    match err {
        PlacesError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        PlacesError::Upstream { status, .. } => TRANSIENT_UPSTREAM_STATUSES.contains(&status.as_str()),
        PlacesError::Deserialize { .. } | PlacesError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors. The delay doubles per attempt from `backoff_base_ms`, with ±25 %
/// jitter, capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PlacesError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlacesError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "places request failed, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
