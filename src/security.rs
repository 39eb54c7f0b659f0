//! Handling of credentials and secret-bearing headers
//!
//! The API key travels with every request, so it is wrapped in
//! [`SecretString`] and masked whenever headers are logged.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Header names whose values are never written to logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
];

/// A string that contains sensitive information and is automatically redacted in Debug/Display
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new SecretString
    pub fn new(value: impl Into<String>) -> Self {
        SecretString(value.into())
    }

    /// Get the actual value (use with caution)
    ///
    /// # Security Warning
    /// Only use this method when you need to actually use the secret value.
    /// Never log or display the result of this method.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Check if the secret is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString({})", REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        SecretString::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        SecretString::new(value)
    }
}

/// Whether a header carries credentials
pub fn is_sensitive_header(name: &str) -> bool {
    SENSITIVE_HEADERS
        .iter()
        .any(|sensitive| sensitive.eq_ignore_ascii_case(name))
}

/// Render headers as `name: value` pairs with credential values masked.
///
/// Non UTF-8 values are shown as `<binary>`.
pub fn redacted_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if is_sensitive_header(name.as_str()) {
                REDACTED
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}: {}", name, shown)
        })
        .collect()
}
