//! Retry with exponential backoff for storefront requests.
//!
//! Only transient failures are retried: HTTP 429 and network-level errors.
//! Everything else (404, other statuses, bad JSON) fails on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Retry budget shared by every request a [`crate::ShopifyClient`] makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure. `0` disables retries.
    pub max_retries: u32,
    /// The n-th retry waits `backoff_base_secs * 2^(n-1)` seconds.
    pub backoff_base_secs: u64,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_secs: u64) -> Self {
        Self {
            max_retries,
            backoff_base_secs,
        }
    }

    /// Delay before retry number `attempt + 1`, saturating on overflow.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let secs = self
            .backoff_base_secs
            .saturating_mul(1u64 << attempt.min(62));
        Duration::from_secs(secs)
    }

    /// Runs `operation` until it succeeds, fails with a non-retriable error,
    /// or the retry budget is spent. The last error is returned in the
    /// latter two cases.
    pub(crate) async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ScraperError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let mut attempt = 0u32;

        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !is_retriable(&err) || attempt >= self.max_retries {
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            tracing::warn!(
                attempt,
                max_retries = self.max_retries,
                delay_secs = delay.as_secs(),
                error = %err,
                "transient storefront error, retrying after backoff"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}
