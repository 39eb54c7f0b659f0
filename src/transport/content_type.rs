//! Corrections for endpoints whose content type does not match what the
//! server actually expects or returns.

use async_trait::async_trait;
use http::Extensions;
use regex::Regex;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Method, Request, Response, StatusCode};
use reqwest_middleware::{Middleware, Next};
use std::sync::LazyLock;

pub const YAML_CONTENT_TYPE: &str = "application/x-yaml";
pub const TEXT_PLAIN_CONTENT_TYPE: &str = "text/plain";

/// Workflow creation takes a raw YAML document as `text/plain`
pub const WORKFLOW_CREATE_PATH: &str = "/api/workflows/create";

/// `/api/monitors/{id}`, optionally with a trailing slash
static MONITOR_BY_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/api/monitors/[^/]+/?$").expect("monitor path pattern is valid")
});

/// Rewrites the request content type for workflow creation and the response
/// content type for monitor fetches.
pub struct ContentTypeFixMiddleware {
    base_path: String,
}

impl ContentTypeFixMiddleware {
    /// `base_path` is the path prefix of the configured base URL; endpoint
    /// paths are matched after it is stripped.
    pub fn new(base_path: &str) -> Self {
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint_path<'a>(&self, path: &'a str) -> &'a str {
        if self.base_path.is_empty() {
            return path;
        }
        match path.strip_prefix(self.base_path.as_str()) {
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }
}

/// Whether a request must be sent as `text/plain`
pub fn needs_text_plain(method: &Method, endpoint_path: &str) -> bool {
    method == Method::POST && endpoint_path == WORKFLOW_CREATE_PATH
}

/// Whether the path fetches a single monitor (and not silences)
pub fn is_monitor_by_id(endpoint_path: &str) -> bool {
    MONITOR_BY_ID.is_match(endpoint_path) && !endpoint_path.contains("silences")
}

/// Whether a response content type should be replaced with YAML
fn needs_yaml_label(content_type: Option<&HeaderValue>) -> bool {
    match content_type.and_then(|v| v.to_str().ok()) {
        Some(value) => !value.starts_with(YAML_CONTENT_TYPE),
        None => true,
    }
}

#[async_trait]
impl Middleware for ContentTypeFixMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let endpoint = self.endpoint_path(req.url().path()).to_string();

        if needs_text_plain(&method, &endpoint) {
            let original = req.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static(TEXT_PLAIN_CONTENT_TYPE),
            );
            tracing::debug!(
                path = %endpoint,
                original = ?original,
                "Set request content type to text/plain"
            );
        }

        let mut response = next.run(req, extensions).await?;

        if method == Method::GET
            && response.status() == StatusCode::OK
            && is_monitor_by_id(&endpoint)
            && needs_yaml_label(response.headers().get(CONTENT_TYPE))
        {
            let original = response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static(YAML_CONTENT_TYPE),
            );
            tracing::debug!(
                path = %endpoint,
                original = ?original,
                "Set response content type to {}",
                YAML_CONTENT_TYPE
            );
        }

        Ok(response)
    }
}
