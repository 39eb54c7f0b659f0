//! Auth, identity, trace-context, and request compression layer

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use http::Extensions;
use reqwest::header::{
    HeaderName, HeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_LENGTH, USER_AGENT,
};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::io::Write;

use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::security::SecretString;

/// Header carrying the tenant/workspace identifier
pub const BACKEND_ID_HEADER: &str = "x-backend-id";

/// W3C trace context header
pub const TRACEPARENT_HEADER: &str = "traceparent";

const ENCODING_GZIP: &str = "gzip";

/// Sets credentials and identity headers on every request and applies the
/// effective gzip, traceparent and timeout settings.
///
/// Sits outside the retry layer, so every attempt carries the same headers.
pub struct HeadersMiddleware {
    authorization: HeaderValue,
    backend_id: HeaderValue,
    user_agent: HeaderValue,
    traceparent: Option<String>,
    gzip: bool,
}

impl HeadersMiddleware {
    /// Validate the header values once so that a bad credential fails at
    /// construction instead of on the first request.
    pub fn try_new(
        api_key: &SecretString,
        backend_id: &str,
        user_agent: &str,
        traceparent: Option<String>,
        gzip: bool,
    ) -> Result<Self> {
        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret())).map_err(|_| {
                Error::Configuration("API key contains invalid header characters".to_string())
            })?;
        authorization.set_sensitive(true);

        let backend_id = HeaderValue::from_str(backend_id).map_err(|_| {
            Error::Configuration(format!(
                "backend ID '{}' contains invalid header characters",
                backend_id
            ))
        })?;

        let user_agent = HeaderValue::from_str(user_agent).map_err(|_| {
            Error::Configuration(format!(
                "user agent '{}' contains invalid header characters",
                user_agent
            ))
        })?;

        if let Some(value) = traceparent.as_deref() {
            HeaderValue::from_str(value).map_err(|_| {
                Error::Configuration(format!("traceparent '{}' is not a valid header value", value))
            })?;
        }

        Ok(Self {
            authorization,
            backend_id,
            user_agent,
            traceparent: traceparent.filter(|value| !value.is_empty()),
            gzip,
        })
    }
}

#[async_trait]
impl Middleware for HeadersMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let overrides = extensions.get::<RequestOptions>();
        let gzip = RequestOptions::effective_gzip(overrides, self.gzip);
        let traceparent =
            RequestOptions::effective_traceparent(overrides, self.traceparent.as_deref())
                .map(|value| {
                    HeaderValue::from_str(value).map_err(|_| {
                        reqwest_middleware::Error::Middleware(anyhow::anyhow!(
                            "traceparent '{}' is not a valid header value",
                            value
                        ))
                    })
                })
                .transpose()?;

        if let Some(timeout) = overrides.and_then(|o| o.timeout) {
            *req.timeout_mut() = Some(timeout);
        }

        if gzip {
            compress_body(&mut req).map_err(reqwest_middleware::Error::Middleware)?;
        }

        let headers = req.headers_mut();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(
            HeaderName::from_static(BACKEND_ID_HEADER),
            self.backend_id.clone(),
        );
        headers.insert(USER_AGENT, self.user_agent.clone());
        if let Some(value) = traceparent {
            headers.insert(HeaderName::from_static(TRACEPARENT_HEADER), value);
        }

        next.run(req, extensions).await
    }
}

/// Replace a buffered request body with its gzip encoding.
///
/// Empty bodies are left alone. Streaming bodies cannot be read here and are
/// sent as they are.
fn compress_body(req: &mut Request) -> anyhow::Result<()> {
    let Some(body) = req.body() else {
        return Ok(());
    };
    let Some(raw) = body.as_bytes() else {
        tracing::debug!(url = %req.url(), "Skipping gzip for streaming request body");
        return Ok(());
    };
    if raw.is_empty() {
        return Ok(());
    }

    let compressed = gzip_bytes(raw)?;
    tracing::trace!(
        original = raw.len(),
        compressed = compressed.len(),
        "Compressed request body"
    );

    *req.body_mut() = Some(compressed.into());
    let headers = req.headers_mut();
    headers.insert(CONTENT_ENCODING, HeaderValue::from_static(ENCODING_GZIP));
    headers.remove(CONTENT_LENGTH);
    Ok(())
}

pub(crate) fn gzip_bytes(raw: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::default());
    encoder.write_all(raw)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn middleware() -> HeadersMiddleware {
        HeadersMiddleware::try_new(
            &SecretString::new("gc-key"),
            "backend-1",
            "groundcover-client/test",
            None,
            false,
        )
        .expect("valid headers")
    }

    #[test]
    fn test_gzip_bytes_decodes_back() {
        let body = br#"{"Promql":"avg(groundcover_container_cpu_limit_m_cpu)"}"#;
        let compressed = gzip_bytes(body).unwrap();

        let mut decoded = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_compress_body_sets_encoding() {
        let mut req = Request::new(
            reqwest::Method::POST,
            "https://api.groundcover.com/api/logs/search".parse().unwrap(),
        );
        *req.body_mut() = Some(b"{\"query\":\"level:error\"}".to_vec().into());
        req.headers_mut()
            .insert(CONTENT_LENGTH, HeaderValue::from_static("23"));

        compress_body(&mut req).unwrap();

        assert_eq!(req.headers().get(CONTENT_ENCODING).unwrap(), "gzip");
        assert!(req.headers().get(CONTENT_LENGTH).is_none());
        let sent = req.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(&sent[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_compress_body_skips_empty_body() {
        let mut req = Request::new(
            reqwest::Method::GET,
            "https://api.groundcover.com/api/workflows/list".parse().unwrap(),
        );

        compress_body(&mut req).unwrap();

        assert!(req.headers().get(CONTENT_ENCODING).is_none());
        assert!(req.body().is_none());
    }

    #[test]
    fn test_invalid_backend_id_is_configuration_error() {
        let result = HeadersMiddleware::try_new(
            &SecretString::new("gc-key"),
            "bad\nbackend",
            "groundcover-client/test",
            None,
            false,
        );
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_empty_client_traceparent_is_dropped() {
        let mw = HeadersMiddleware::try_new(
            &SecretString::new("gc-key"),
            "backend-1",
            "groundcover-client/test",
            Some(String::new()),
            true,
        )
        .unwrap();
        assert!(mw.traceparent.is_none());
        assert!(mw.gzip);
        assert!(middleware().authorization.is_sensitive());
    }
}
