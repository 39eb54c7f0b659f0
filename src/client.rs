//! Main client for interacting with the groundcover API

use bon::bon;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use reqwest_middleware::{ClientWithMiddleware, Middleware, RequestBuilder};
use serde::Serialize;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::base_url::{endpoint_url, parse_base_url, DEFAULT_BASE_URL};
use crate::error::{error_for_response, Error, Result};
use crate::options::RequestOptions;
use crate::security::SecretString;
use crate::transport::{HeadersMiddleware, RetryConfig, TransportChain};

/// SDK version for User-Agent header
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
const SDK_NAME: &str = env!("CARGO_PKG_NAME");

/// Default timeout for API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const API_KEY_ENV: &str = "GC_API_KEY";
pub const BACKEND_ID_ENV: &str = "GC_BACKEND_ID";
pub const BASE_URL_ENV: &str = "GC_BASE_URL";
pub const TRACEPARENT_ENV: &str = "GC_TRACEPARENT";
pub const DEBUG_ENV: &str = "SDK_DEBUG";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Main client for interacting with the groundcover API
#[derive(Clone)]
pub struct GroundcoverClient {
    backend_id: String,
    base_url: Url,
    http: ClientWithMiddleware,
}

impl fmt::Debug for GroundcoverClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroundcoverClient")
            .field("backend_id", &self.backend_id)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Explicit value first, then a non-empty environment variable.
fn explicit_or_env(explicit: Option<String>, var: &str) -> Option<String> {
    explicit.or_else(|| env::var(var).ok().filter(|value| !value.is_empty()))
}

#[bon]
impl GroundcoverClient {
    /// Create a new client.
    ///
    /// Credentials not given explicitly are read from `GC_API_KEY`,
    /// `GC_BACKEND_ID`, and `GC_BASE_URL`. The base URL defaults to
    /// <https://api.groundcover.com>. A missing API key or backend ID is a
    /// configuration error; nothing is sent over the network before that
    /// check.
    ///
    /// - `traceparent`: default trace context sent with every request
    /// - `gzip`: compress request bodies unless a request says otherwise
    /// - `retry`: retry policy, [`RetryConfig::default`] when unset
    /// - `http_client`: base client to wrap; `timeout` and `connect_timeout`
    ///   are ignored when it is set
    /// - `middleware`: extra layers placed between debug logging and the
    ///   built-in layers
    /// - `debug_logging`: log every request and response at `debug` level
    #[builder]
    pub fn new(
        #[builder(into)] api_key: Option<String>,
        #[builder(into)] backend_id: Option<String>,
        #[builder(into)] base_url: Option<String>,
        #[builder(into)] traceparent: Option<String>,
        #[builder(default)] gzip: bool,
        retry: Option<RetryConfig>,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
        #[builder(into)] user_agent: Option<String>,
        http_client: Option<reqwest::Client>,
        #[builder(default)] middleware: Vec<Arc<dyn Middleware>>,
        #[builder(default)] debug_logging: bool,
    ) -> Result<Self> {
        let api_key = explicit_or_env(api_key, API_KEY_ENV)
            .filter(|key| !key.is_empty())
            .map(SecretString::new)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "API key is required: set {} or use .api_key()",
                    API_KEY_ENV
                ))
            })?;

        let backend_id = explicit_or_env(backend_id, BACKEND_ID_ENV)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "backend ID is required: set {} or use .backend_id()",
                    BACKEND_ID_ENV
                ))
            })?;

        let base_url = explicit_or_env(base_url, BASE_URL_ENV)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let default_user_agent = format!("{}/{} (Rust)", SDK_NAME, SDK_VERSION);
        let user_agent = user_agent.unwrap_or(default_user_agent);

        let headers =
            HeadersMiddleware::try_new(&api_key, &backend_id, &user_agent, traceparent, gzip)?;

        let base = match http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
                .connect_timeout(connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT))
                .pool_max_idle_per_host(10)
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .map_err(|e| {
                    Error::Configuration(format!("failed to build HTTP client: {}", e))
                })?,
        };

        let http = TransportChain {
            base,
            headers,
            retry: retry.unwrap_or_default(),
            base_path: base_url.path().to_string(),
            extra: middleware,
            debug_logging,
        }
        .build();

        tracing::debug!(
            base_url = %base_url,
            backend_id = %backend_id,
            gzip,
            debug_logging,
            "Created groundcover client"
        );

        Ok(Self {
            backend_id,
            base_url,
            http,
        })
    }

    /// Create a new client from environment variables
    ///
    /// Reads from:
    /// - `GC_API_KEY`: Required API key
    /// - `GC_BACKEND_ID`: Required backend ID
    /// - `GC_BASE_URL`: Optional base URL (defaults to <https://api.groundcover.com>)
    /// - `GC_TRACEPARENT`: Optional default traceparent
    /// - `SDK_DEBUG`: Any non-empty value enables request/response debug logging
    pub fn from_env() -> Result<Self> {
        let debug_logging = env::var(DEBUG_ENV)
            .map(|value| !value.is_empty())
            .unwrap_or(false);

        Self::builder()
            .maybe_traceparent(env::var(TRACEPARENT_ENV).ok())
            .debug_logging(debug_logging)
            .build()
    }

    /// Backend ID sent with every request
    pub fn backend_id(&self) -> &str {
        &self.backend_id
    }

    /// Normalized base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying client with the full transport chain
    pub fn http(&self) -> &ClientWithMiddleware {
        &self.http
    }

    /// Start a request to any API path through the full transport chain.
    ///
    /// Use this for endpoints without a dedicated method. Each `/`-separated
    /// part of `path` is sent as one encoded segment; add query parameters
    /// with `.query(...)`. Attach [`RequestOptions`] with `.with_extension(...)`
    /// to override client defaults for this request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, endpoint_url(&self.base_url, path))
    }

    pub(crate) fn prepare(
        &self,
        method: Method,
        path: &str,
        options: Option<RequestOptions>,
    ) -> RequestBuilder {
        let builder = self.request(method, path);
        match options {
            Some(options) => builder.with_extension(options),
            None => builder,
        }
    }

    /// Send a request and turn non-2xx responses into errors
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let response = builder.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_for_response(response).await)
        }
    }

    /// Send a request with a JSON body
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        options: Option<RequestOptions>,
    ) -> Result<reqwest::Response> {
        let payload = serde_json::to_vec(body)?;
        let builder = self
            .prepare(method, path, options)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(payload);
        self.send(builder).await
    }

    /// Send a request without a body
    pub(crate) async fn send_empty(
        &self,
        method: Method,
        path: &str,
        options: Option<RequestOptions>,
    ) -> Result<reqwest::Response> {
        self.send(self.prepare(method, path, options)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GroundcoverClient {
        GroundcoverClient::builder()
            .api_key("gc-key")
            .backend_id("backend-1")
            .base_url("api.groundcover.com")
            .build()
            .expect("valid configuration")
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = client();
        assert_eq!(client.base_url().as_str(), "https://api.groundcover.com/");
        assert_eq!(client.backend_id(), "backend-1");
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        let result = GroundcoverClient::builder()
            .api_key("")
            .backend_id("backend-1")
            .base_url("https://api.groundcover.com")
            .build();
        assert!(matches!(result, Err(Error::Configuration(msg)) if msg.contains("API key")));
    }

    #[test]
    fn test_empty_backend_id_is_rejected() {
        let result = GroundcoverClient::builder()
            .api_key("gc-key")
            .backend_id("")
            .base_url("https://api.groundcover.com")
            .build();
        assert!(matches!(result, Err(Error::Configuration(msg)) if msg.contains("backend ID")));
    }

    #[test]
    fn test_empty_base_url_is_rejected() {
        let result = GroundcoverClient::builder()
            .api_key("gc-key")
            .backend_id("backend-1")
            .base_url("")
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_debug_output_hides_credentials() {
        let rendered = format!("{:?}", client());
        assert!(rendered.contains("backend-1"));
        assert!(!rendered.contains("gc-key"));
    }
}
