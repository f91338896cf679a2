//! Backoff retry for idempotent reads.

use crate::config::RetrySettings;
use crate::error::ApiClientError;

use std::future::Future;
use std::time::Duration;

use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use log::{debug, warn};
use tokio::time::sleep as TokioSleep;

const BACKOFF_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts.max(1),
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Doubling delays from `initial_delay`, capped at `max_delay`, no jitter.
    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_delay)
            .with_multiplier(BACKOFF_MULTIPLIER)
            .with_randomization_factor(0.0)
            .with_max_interval(self.max_delay)
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` is used up. The last error is returned.
///
/// Only [`ApiClientError::is_retryable`] failures are retried: no response,
/// 429 and 5xx. Any other 4xx is returned immediately.
pub async fn retry_idempotent<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ApiClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiClientError>>,
{
    let mut backoff = policy.backoff();
    let mut attempt = 1;

    loop {
        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !error.is_retryable() {
            debug!("Not retrying {} failure", error.error_category());
            return Err(error);
        }
        if attempt >= policy.max_attempts {
            warn!("Giving up after {} attempts", attempt);
            return Err(error);
        }

        match backoff.next_backoff() {
            Some(delay) => {
                warn!(
                    "Attempt {}/{} failed ({}), retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    error.error_category(),
                    delay
                );
                TokioSleep(delay).await;
            }
            None => return Err(error),
        }
        attempt += 1;
    }
}
