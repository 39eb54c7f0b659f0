//! The HTTP transport chain
//!
//! Every request passes through these layers, outermost first:
//!
//! 1. [`DebugLoggingMiddleware`] (only when debug logging is enabled)
//! 2. caller-supplied middleware, in the order given
//! 3. [`ContentTypeFixMiddleware`]
//! 4. [`HeadersMiddleware`] (auth, backend ID, user agent, traceparent, gzip)
//! 5. [`RetryMiddleware`]
//! 6. the base `reqwest::Client`
//!
//! The response travels back through the same layers in reverse.

pub mod content_type;
pub mod debug;
pub mod headers;
pub mod retry;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware};
use std::sync::Arc;

pub use content_type::{ContentTypeFixMiddleware, YAML_CONTENT_TYPE};
pub use debug::DebugLoggingMiddleware;
pub use headers::{HeadersMiddleware, BACKEND_ID_HEADER, TRACEPARENT_HEADER};
pub use retry::{RetryConfig, RetryMiddleware, DEFAULT_RETRY_STATUSES};

/// Everything needed to assemble the chain around a base client
pub(crate) struct TransportChain {
    pub base: reqwest::Client,
    pub headers: HeadersMiddleware,
    pub retry: RetryConfig,
    pub base_path: String,
    pub extra: Vec<Arc<dyn Middleware>>,
    pub debug_logging: bool,
}

impl TransportChain {
    /// Register the layers on a `reqwest_middleware` client.
    ///
    /// Middleware registered first runs first on the way out.
    pub fn build(self) -> ClientWithMiddleware {
        let mut builder = ClientBuilder::new(self.base);

        if self.debug_logging {
            builder = builder.with(DebugLoggingMiddleware);
        }
        for middleware in self.extra {
            builder = builder.with_arc(middleware);
        }

        builder
            .with(ContentTypeFixMiddleware::new(&self.base_path))
            .with(self.headers)
            .with(RetryMiddleware::new(self.retry))
            .build()
    }
}
