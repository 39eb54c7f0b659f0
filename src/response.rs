//! Response body consumers
//!
//! The consumer is picked from the response `Content-Type`: JSON bodies are
//! decoded with `serde_json`, YAML bodies are passed through as raw bytes for
//! the caller to parse.

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::transport::YAML_CONTENT_TYPE;

const JSON_CONTENT_TYPE: &str = "application/json";

fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == JSON_CONTENT_TYPE || essence.ends_with("+json")
}

/// Decode a JSON body. A missing content type is read as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if let Some(actual) = content_type(&response) {
        if !is_json(&actual) {
            return Err(Error::UnexpectedContentType {
                expected: JSON_CONTENT_TYPE,
                actual: Some(actual),
            });
        }
    }

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Hand a YAML body to the caller without parsing it
pub(crate) async fn read_yaml_bytes(response: reqwest::Response) -> Result<Bytes> {
    let actual = content_type(&response);
    match actual.as_deref() {
        Some(value) if value.starts_with(YAML_CONTENT_TYPE) => Ok(response.bytes().await?),
        _ => Err(Error::UnexpectedContentType {
            expected: YAML_CONTENT_TYPE,
            actual,
        }),
    }
}

/// Drain and discard the body
pub(crate) async fn discard(response: reqwest::Response) -> Result<()> {
    response.bytes().await?;
    Ok(())
}
