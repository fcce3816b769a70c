//! Retry policy for the HTTP connector.
//!
//! Retries exist only at the transport level; the executor loop never
//! retries. Queries are read-only, but callers can still disable retries
//! entirely with [`RetryStrategy::Never`].

use std::time::Duration;

use rand::Rng;

use crate::error::QueryError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Retry strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStrategy {
    /// Never retry.
    Never,
    /// Retry retryable transport errors.
    Always,
}

/// Retry policy configuration.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: usize,
    /// Base delay for exponential backoff.
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Maximum jitter to add to delays.
    pub max_jitter: Duration,
    /// Retry strategy.
    pub strategy: RetryStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            max_jitter: Duration::from_millis(150),
            strategy: RetryStrategy::Always,
        }
    }
}

impl RetryPolicy {
    /// Decide whether to retry based on the error and attempt count.
    #[must_use]
    pub fn decide(&self, error: &QueryError, attempt: usize) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::DoNotRetry;
        }
        if !error.is_retryable() {
            return RetryDecision::DoNotRetry;
        }

        match self.strategy {
            RetryStrategy::Never => RetryDecision::DoNotRetry,
            RetryStrategy::Always => {
                let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
                let exp = 2_u64
                    .saturating_pow(u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX));
                let mut delay_ms = base_ms.saturating_mul(exp);
                let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
                if delay_ms > max_ms {
                    delay_ms = max_ms;
                }
                let jitter_ms = if self.max_jitter.as_millis() > 0 {
                    let mut rng = rand::thread_rng();
                    let jitter_max = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
                    rng.gen_range(0..=jitter_max)
                } else {
                    0
                };
                RetryDecision::RetryAfter(Duration::from_millis(delay_ms + jitter_ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    fn server_error() -> QueryError {
        QueryError::HttpStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
            retry_after: None,
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
            max_jitter: Duration::ZERO,
            strategy: RetryStrategy::Always,
        };
        assert_eq!(
            policy.decide(&server_error(), 1),
            RetryDecision::RetryAfter(Duration::from_millis(100))
        );
        assert_eq!(
            policy.decide(&server_error(), 2),
            RetryDecision::RetryAfter(Duration::from_millis(200))
        );
        assert_eq!(
            policy.decide(&server_error(), 3),
            RetryDecision::RetryAfter(Duration::from_millis(300))
        );
    }

    #[test]
    fn attempts_are_bounded() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.decide(&server_error(), policy.max_attempts),
            RetryDecision::DoNotRetry
        );
    }

    #[test]
    fn non_retryable_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        let err = QueryError::NoSelection;
        assert_eq!(policy.decide(&err, 1), RetryDecision::DoNotRetry);
    }

    #[test]
    fn never_strategy_blocks_retries() {
        let policy = RetryPolicy {
            strategy: RetryStrategy::Never,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.decide(&server_error(), 1), RetryDecision::DoNotRetry);
    }
}
