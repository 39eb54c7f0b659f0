//! Retry layer with jittered exponential backoff
//!
//! ## Default Configuration
//!
//! | Setting | Default Value | Description |
//! |---------|--------------|-------------|
//! | `max_retries` | 3 | Retries after the first attempt |
//! | `min_wait` | 1 second | Delay before the first retry |
//! | `max_wait` | 30 seconds | Upper bound for any delay |
//! | `retry_statuses` | 503, 429, 502, 504 | Status codes worth another attempt |
//!
//! Only responses carrying one of `retry_statuses` are retried. Connection
//! and timeout errors are returned to the caller on the first occurrence.

use async_trait::async_trait;
use http::Extensions;
use rand::Rng;
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use std::time::Duration;

/// Default retry attempts
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry
const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(1);

/// Default delay ceiling
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// Statuses retried when none are configured
pub const DEFAULT_RETRY_STATUSES: [StatusCode; 4] = [
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::BAD_GATEWAY,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Configuration for the retry layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum retries after the first attempt; zero disables retrying
    pub max_retries: u32,
    /// Delay before the first retry
    pub min_wait: Duration,
    /// Maximum delay between attempts
    pub max_wait: Duration,
    /// Status codes that trigger a retry
    pub retry_statuses: Vec<StatusCode>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}

impl RetryConfig {
    /// Create a configuration, falling back to the default status set when
    /// `retry_statuses` is empty.
    pub fn new(
        max_retries: u32,
        min_wait: Duration,
        max_wait: Duration,
        retry_statuses: impl IntoIterator<Item = StatusCode>,
    ) -> Self {
        let retry_statuses: Vec<StatusCode> = retry_statuses.into_iter().collect();
        Self {
            max_retries,
            min_wait,
            max_wait,
            retry_statuses: if retry_statuses.is_empty() {
                DEFAULT_RETRY_STATUSES.to_vec()
            } else {
                retry_statuses
            },
        }
        .normalized()
    }

    /// Disable retrying entirely
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Ensure `max_wait` is never below `min_wait`
    pub fn normalized(mut self) -> Self {
        if self.max_wait < self.min_wait {
            self.max_wait = self.min_wait;
        }
        self
    }

    /// Whether a response with this status should be retried
    pub fn retries_status(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Undithered delay before retry number `attempt` (0-based):
    /// `min_wait * 2^attempt`, capped at `max_wait`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.min_wait
            .checked_mul(factor)
            .unwrap_or(self.max_wait)
            .min(self.max_wait)
    }

    /// Delay before retry number `attempt` with up to 25% jitter added.
    ///
    /// The result stays within `[min_wait, max_wait]` and never drops below
    /// the delay of an earlier attempt.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        let jitter_range = base.as_millis() as u64 / 4;
        let jitter = if jitter_range == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_range)
        };
        (base + Duration::from_millis(jitter)).min(self.max_wait)
    }
}

/// Retries responses whose status is in the configured set
pub struct RetryMiddleware {
    config: RetryConfig,
}

impl RetryMiddleware {
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }
}

#[async_trait]
impl Middleware for RetryMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let mut attempt: u32 = 0;
        loop {
            let Some(attempt_req) = req.try_clone() else {
                tracing::trace!(url = %req.url(), "Request body is not cloneable, sending once");
                return next.run(req, extensions).await;
            };

            // Transport errors are returned as-is
            let response = next.clone().run(attempt_req, extensions).await?;
            let status = response.status();

            if !self.config.retries_status(status) {
                return Ok(response);
            }
            if attempt >= self.config.max_retries {
                if self.config.max_retries > 0 {
                    tracing::warn!(
                        method = %req.method(),
                        url = %req.url(),
                        status = status.as_u16(),
                        attempts = attempt + 1,
                        "Retries exhausted"
                    );
                }
                return Ok(response);
            }

            let delay = self.config.backoff_delay(attempt);
            tracing::debug!(
                method = %req.method(),
                url = %req.url(),
                status = status.as_u16(),
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "Retrying request"
            );

            // Release the connection before sleeping
            drop(response);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min_ms: u64, max_ms: u64) -> RetryConfig {
        RetryConfig::new(
            8,
            Duration::from_millis(min_ms),
            Duration::from_millis(max_ms),
            [],
        )
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.min_wait, Duration::from_secs(1));
        assert_eq!(config.max_wait, Duration::from_secs(30));
        for status in [503, 429, 502, 504] {
            assert!(config.retries_status(StatusCode::from_u16(status).unwrap()));
        }
        assert!(!config.retries_status(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_empty_statuses_fall_back_to_defaults() {
        let config = RetryConfig::new(1, Duration::from_millis(1), Duration::from_millis(2), []);
        assert_eq!(config.retry_statuses, DEFAULT_RETRY_STATUSES.to_vec());

        let custom = RetryConfig::new(
            1,
            Duration::from_millis(1),
            Duration::from_millis(2),
            [StatusCode::INTERNAL_SERVER_ERROR],
        );
        assert!(custom.retries_status(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!custom.retries_status(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_max_wait_below_min_is_raised() {
        let config = config(500, 100);
        assert_eq!(config.max_wait, Duration::from_millis(500));
        assert_eq!(config.backoff_delay(0), Duration::from_millis(500));
    }

    #[test]
    fn test_base_delay_doubles_until_cap() {
        let config = config(100, 1_000);
        assert_eq!(config.base_delay(0), Duration::from_millis(100));
        assert_eq!(config.base_delay(1), Duration::from_millis(200));
        assert_eq!(config.base_delay(3), Duration::from_millis(800));
        assert_eq!(config.base_delay(4), Duration::from_millis(1_000));
        assert_eq!(config.base_delay(40), Duration::from_millis(1_000));
    }

    #[test]
    fn test_backoff_is_bounded_and_non_decreasing() {
        let config = config(100, 3_000);
        for _ in 0..200 {
            let mut previous = Duration::ZERO;
            for attempt in 0..config.max_retries {
                let delay = config.backoff_delay(attempt);
                assert!(delay >= config.min_wait, "{:?} below min", delay);
                assert!(delay <= config.max_wait, "{:?} above max", delay);
                assert!(delay >= previous, "{:?} < {:?}", delay, previous);
                previous = delay;
            }
        }
    }

    #[test]
    fn test_disabled_config() {
        assert_eq!(RetryConfig::disabled().max_retries, 0);
    }
}
