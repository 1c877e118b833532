//! Linear backoff retry policy for page fetches.

use std::future::Future;
use std::time::Duration;

use crate::{Error, FailureKind};

/// Attempts per URL before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Base wait unit; attempt `n` waits `2 * n` units.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);
/// Per-request timeout, independent of the backoff schedule.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// How many times a fetch is attempted and how long to wait in between.
///
/// The wait after failed attempt `n` (1-based) is `backoff_unit * 2 * n`:
/// no jitter and no cap other than the attempt limit. Nothing is waited
/// after the final attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: DEFAULT_BACKOFF_UNIT,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32, backoff_unit: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }

    /// Reads `PROPERTYFINDER_RETRY_MAX` and `PROPERTYFINDER_RETRY_UNIT_MS`,
    /// falling back to the defaults for missing or unparsable values.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`RetryPolicy::from_env`], reading variables through `var`.
    ///
    /// An attempt count of zero or one that does not fit in `u32` is
    /// ignored, as are unparsable values.
    pub fn from_vars<F: Fn(&str) -> Option<String>>(var: F) -> Self {
        let max_attempts = positive_u64(&var, "PROPERTYFINDER_RETRY_MAX")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let backoff_unit = parse_u64(&var, "PROPERTYFINDER_RETRY_UNIT_MS")
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_BACKOFF_UNIT);
        Self::new(max_attempts, backoff_unit)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// Wait before retrying after the given failed attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(2u32.saturating_mul(attempt))
    }
}

/// Reads `PROPERTYFINDER_TIMEOUT_SECS`, defaulting to [`DEFAULT_REQUEST_TIMEOUT`].
pub fn request_timeout_from_env() -> Duration {
    request_timeout_from_vars(|key| std::env::var(key).ok())
}

/// Like [`request_timeout_from_env`], reading variables through `var`. A
/// zero timeout is ignored.
pub fn request_timeout_from_vars<F: Fn(&str) -> Option<String>>(var: F) -> Duration {
    positive_u64(&var, "PROPERTYFINDER_TIMEOUT_SECS")
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
}

/// Runs `op` until it succeeds or the policy's attempt budget is spent.
///
/// `op` receives the 1-based attempt number. Every failure is logged with
/// its class and `url` before the linear backoff sleep.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, url: &str, mut op: F) -> Result<T, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FailureKind>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(failure) => {
                if attempt >= policy.max_attempts {
                    tracing::warn!(
                        "{} for {} (attempt {}/{}), giving up",
                        failure,
                        url,
                        attempt,
                        policy.max_attempts
                    );
                    return Err(Error::RetriesExhausted {
                        url: url.to_string(),
                        attempts: attempt,
                        last: failure,
                    });
                }
                let delay = policy.delay_for_attempt(attempt);
                tracing::warn!(
                    "{} for {} (attempt {}/{}), retrying in {:.1}s",
                    failure,
                    url,
                    attempt,
                    policy.max_attempts,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

fn parse_u64<F: Fn(&str) -> Option<String>>(var: &F, key: &str) -> Option<u64> {
    var(key).and_then(|val| val.trim().parse::<u64>().ok())
}

fn positive_u64<F: Fn(&str) -> Option<String>>(var: &F, key: &str) -> Option<u64> {
    parse_u64(var, key).filter(|&n| n > 0)
}
