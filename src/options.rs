//! Per-request overrides
//!
//! A [`RequestOptions`] value travels with a single request as a
//! `reqwest_middleware` extension. Any field that is set takes precedence over
//! the default the client was built with; unset fields fall back to it.
//!
//! ```no_run
//! use groundcover_client::{GroundcoverClient, RequestOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroundcoverClient::from_env()?;
//!
//! let rows = client
//!     .search_logs()
//!     .query("level:error | limit 10")
//!     .options(
//!         RequestOptions::new()
//!             .gzip(false)
//!             .traceparent("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
//!     )
//!     .call()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

/// Request-scoped configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Compress the request body with gzip
    pub gzip: Option<bool>,
    /// W3C trace context to propagate; an empty string sends no header
    pub traceparent: Option<String>,
    /// Timeout applied to each attempt of this request
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the client's gzip setting for this request
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = Some(enabled);
        self
    }

    /// Override the client's traceparent for this request
    pub fn traceparent(mut self, traceparent: impl Into<String>) -> Self {
        self.traceparent = Some(traceparent.into());
        self
    }

    /// Set a timeout for this request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Resolve the effective gzip flag against a client default
    pub fn effective_gzip(options: Option<&Self>, client_default: bool) -> bool {
        options.and_then(|o| o.gzip).unwrap_or(client_default)
    }

    /// Resolve the effective traceparent against a client default.
    ///
    /// Returns `None` when no header should be sent.
    pub fn effective_traceparent<'a>(
        options: Option<&'a Self>,
        client_default: Option<&'a str>,
    ) -> Option<&'a str> {
        options
            .and_then(|o| o.traceparent.as_deref())
            .or(client_default)
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gzip_override_wins_over_default() {
        let disable = RequestOptions::new().gzip(false);
        let enable = RequestOptions::new().gzip(true);

        assert!(!RequestOptions::effective_gzip(Some(&disable), true));
        assert!(RequestOptions::effective_gzip(Some(&enable), false));
    }

    #[test]
    fn test_gzip_falls_back_to_default() {
        let unrelated = RequestOptions::new().traceparent("00-abc-def-01");

        assert!(RequestOptions::effective_gzip(None, true));
        assert!(RequestOptions::effective_gzip(Some(&unrelated), true));
        assert!(!RequestOptions::effective_gzip(Some(&unrelated), false));
    }

    #[test]
    fn test_traceparent_precedence() {
        let custom = RequestOptions::new().traceparent("00-request-span-01");
        assert_eq!(
            RequestOptions::effective_traceparent(Some(&custom), Some("00-client-span-01")),
            Some("00-request-span-01")
        );
        assert_eq!(
            RequestOptions::effective_traceparent(None, Some("00-client-span-01")),
            Some("00-client-span-01")
        );
        assert_eq!(RequestOptions::effective_traceparent(None, None), None);
    }

    #[test]
    fn test_empty_traceparent_suppresses_default() {
        let cleared = RequestOptions::new().traceparent("");
        assert_eq!(
            RequestOptions::effective_traceparent(Some(&cleared), Some("00-client-span-01")),
            None
        );
    }
}
