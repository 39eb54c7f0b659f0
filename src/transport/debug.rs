//! Request/response logging for troubleshooting

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::time::Instant;

use crate::security::redacted_headers;

/// Logs each exchange at `debug` level with credentials masked.
///
/// Bodies are not read, so streaming responses stay intact.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebugLoggingMiddleware;

#[async_trait]
impl Middleware for DebugLoggingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        let body_len = req.body().and_then(|b| b.as_bytes()).map(<[u8]>::len);

        tracing::debug!(
            %method,
            %url,
            headers = ?redacted_headers(req.headers()),
            body_len = ?body_len,
            "HTTP request"
        );

        let started = Instant::now();
        let result = next.run(req, extensions).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => tracing::debug!(
                %method,
                %url,
                status = response.status().as_u16(),
                headers = ?redacted_headers(response.headers()),
                elapsed_ms,
                "HTTP response"
            ),
            Err(err) => tracing::debug!(
                %method,
                %url,
                error = %err,
                elapsed_ms,
                "HTTP request failed"
            ),
        }

        result
    }
}
