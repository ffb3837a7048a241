//! Retry policy and exponential backoff for outbound requests.
//!
//! [`RetryPolicy`] is a plain value describing which outcomes are transient
//! and how long to wait between attempts. [`retry_with_backoff`] consumes it
//! and knows nothing about profile semantics or call sites.

use std::future::Future;
use std::time::Duration;

use igfc_core::RequestSettings;

use crate::error::ScraperError;

/// Statuses that signal overload or a transient server fault.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one. `0` disables retries.
    pub max_retries: u32,
    /// Delay before retry `n` (1-based) is `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
    pub max_backoff_ms: u64,
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 500,
            max_backoff_ms: 30_000,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_settings(settings: &RequestSettings) -> Self {
        Self {
            max_retries: settings.retries,
            backoff_base_ms: settings.backoff_base_ms,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Backoff before the given 1-based retry, capped at `max_backoff_ms`.
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(20);
        let delay_ms = self
            .backoff_base_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay_ms)
    }

    /// Returns `true` if `err` is worth another attempt.
    ///
    /// Retriable:
    /// - [`ScraperError::TransientStatus`]: 429 or a transient 5xx.
    /// - [`ScraperError::Http`] from a timeout, a refused or reset
    ///   connection, or a body that could not be read.
    ///
    /// Everything else (redirect loops, builder errors, bad URLs) is final.
    #[must_use]
    pub fn is_retriable(&self, err: &ScraperError) -> bool {
        match err {
            ScraperError::TransientStatus { response } => {
                self.is_retryable_status(response.status)
            }
            ScraperError::Http(e) => {
                !e.is_redirect()
                    && !e.is_builder()
                    && (e.is_timeout() || e.is_connect() || e.is_request() || e.is_body())
            }
            ScraperError::InvalidUrl { .. }
            | ScraperError::InvalidConfig(_) => false,
        }
    }
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// `policy.max_retries` additional attempts have been spent.
///
/// # Backoff schedule (example with `backoff_base_ms = 500`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|---------------------------|
/// | 0 (initial) | none |
/// | 1 (first retry) | 500 ms |
/// | 2 (second retry) | 1 000 ms |
/// | 3 (third retry) | 2 000 ms |
///
/// The last error is returned once retries are exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !policy.is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = policy.backoff_for(attempt);
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient request failure; retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
