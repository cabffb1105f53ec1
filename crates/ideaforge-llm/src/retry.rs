//! Linear back-off retry loop for the inference gateway.

use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

/// Whether an error is worth another attempt.
///
/// Transport failures, non-success statuses, and answers missing their
/// content are all transient from the gateway's point of view. A missing
/// API key is configuration and returns immediately.
pub(crate) fn is_retriable(err: &LlmError) -> bool {
    !matches!(err, LlmError::MissingApiKey)
}

/// Drives `operation` through up to `1 + max_retries` attempts.
///
/// The sleep before retry `n` is `backoff_base_ms * n`, so the default
/// 250 ms base waits 250 ms, then 500 ms. Whatever error the final attempt
/// produced is the one returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    for retry in 1..=max_retries {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) {
            return Err(err);
        }

        let delay_ms = backoff_base_ms.saturating_mul(u64::from(retry));
        tracing::warn!(
            retry,
            max_retries,
            delay_ms,
            error = %err,
            "inference attempt failed, backing off"
        );
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
    operation().await
}
