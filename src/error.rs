//! Error types for the groundcover client

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A transport layer rejected the request before it reached the network
    #[error("Transport middleware error: {0}")]
    Middleware(anyhow::Error),

    /// Authentication failure
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        /// Request ID for debugging
        request_id: Option<String>,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimit {
        /// How long to wait before retrying
        retry_after: Option<Duration>,
        /// Request ID for debugging
        request_id: Option<String>,
    },

    /// Server error (5xx status codes)
    #[error("Server error (status {status}): {message}")]
    Server {
        status: u16,
        message: String,
        /// Request ID for debugging
        request_id: Option<String>,
    },

    /// Client error (4xx status codes other than auth/rate limit)
    #[error("Client error (status {status}): {message}")]
    Client {
        status: u16,
        message: String,
        /// Request ID for debugging
        request_id: Option<String>,
    },

    /// The response body was labelled with a content type the consumer cannot read
    #[error("Unexpected content type: expected {expected}, got {actual:?}")]
    UnexpectedContentType {
        expected: &'static str,
        actual: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest_middleware::Error> for Error {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Error::Network(e),
            reqwest_middleware::Error::Middleware(e) => Error::Middleware(e),
        }
    }
}

impl Error {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::RateLimit { .. } => true,
            Error::Server { .. } => true,
            Error::Auth { .. } => false,
            Error::Client { .. } => false,
            Error::Validation(_) => false,
            Error::Serialization(_) => false,
            Error::Configuration(_) => false,
            Error::Middleware(_) => false,
            Error::UnexpectedContentType { .. } => false,
        }
    }

    /// Get the retry delay if applicable
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimit { retry_after, .. } => *retry_after,
            Error::Server { .. } => Some(Duration::from_secs(5)),
            Error::Network(_) => Some(Duration::from_secs(1)),
            _ => None,
        }
    }

    /// Get the request ID if available
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Auth { request_id, .. }
            | Error::RateLimit { request_id, .. }
            | Error::Server { request_id, .. }
            | Error::Client { request_id, .. } => request_id.as_deref(),
            _ => None,
        }
    }
}

/// Turn a non-success response into the matching error variant.
///
/// Consumes the response because the body becomes the error message.
pub(crate) async fn error_for_response(response: reqwest::Response) -> Error {
    let status = response.status();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match status.as_u16() {
        401 | 403 => Error::Auth {
            message: response
                .text()
                .await
                .unwrap_or_else(|_| "Authentication failed".to_string()),
            request_id,
        },
        429 => {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);

            Error::RateLimit {
                retry_after,
                request_id,
            }
        }
        500..=599 => Error::Server {
            status: status.as_u16(),
            message: response
                .text()
                .await
                .unwrap_or_else(|_| "Server error".to_string()),
            request_id,
        },
        _ => Error::Client {
            status: status.as_u16(),
            message: response
                .text()
                .await
                .unwrap_or_else(|_| format!("Unexpected status: {}", status)),
            request_id,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Server {
            status: 503,
            message: "unavailable".to_string(),
            request_id: None,
        }
        .is_retryable());
        assert!(!Error::Configuration("missing api key".to_string()).is_retryable());
        assert!(!Error::UnexpectedContentType {
            expected: "application/json",
            actual: None,
        }
        .is_retryable());
    }

    #[test]
    fn test_request_id_exposed() {
        let err = Error::Client {
            status: 404,
            message: "not found".to_string(),
            request_id: Some("req-123".to_string()),
        };
        assert_eq!(err.request_id(), Some("req-123"));
        assert_eq!(Error::Validation("empty query".to_string()).request_id(), None);
    }

    #[test]
    fn test_rate_limit_retry_after() {
        let err = Error::RateLimit {
            retry_after: Some(Duration::from_secs(7)),
            request_id: None,
        };
        assert_eq!(err.retry_after(), Some(Duration::from_secs(7)));
    }
}
