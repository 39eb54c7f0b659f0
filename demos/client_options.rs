//! Client and per-request transport options
//!
//! Run with: `cargo run --example client_options`
//!
//! Shows the retry policy, gzip, trace propagation, request-level overrides,
//! and plugging an extra `reqwest-middleware` layer into the chain.

use async_trait::async_trait;
use groundcover_client::{GroundcoverClient, RequestOptions, RetryConfig};
use reqwest::{Method, StatusCode};
use reqwest_middleware::{Middleware, Next};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Prints the duration of each call, retries included
struct TimingMiddleware;

#[async_trait]
impl Middleware for TimingMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let path = req.url().path().to_string();
        let started = Instant::now();
        let result = next.run(req, extensions).await;
        println!("{} took {:?}", path, started.elapsed());
        result
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Retry 500s as well as the default statuses, waiting 200ms..5s
    let retry = RetryConfig::new(
        5,
        Duration::from_millis(200),
        Duration::from_secs(5),
        [
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::BAD_GATEWAY,
            StatusCode::GATEWAY_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
        ],
    );

    // Credentials and base URL come from GC_API_KEY, GC_BACKEND_ID, GC_BASE_URL
    let client = GroundcoverClient::builder()
        .gzip(true)
        .traceparent("00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01")
        .retry(retry)
        .timeout(Duration::from_secs(30))
        .middleware(vec![Arc::new(TimingMiddleware) as Arc<dyn Middleware>])
        .debug_logging(true)
        .build()?;

    // Client defaults: gzip on, client traceparent
    let events = client
        .search_events()
        .query("type:container_crash")
        .call()
        .await?;
    println!("{} crash events", events.len());

    // This request only: no gzip, its own trace, shorter timeout
    let options = RequestOptions::new()
        .gzip(false)
        .traceparent("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")
        .timeout(Duration::from_secs(5));
    let logs = client
        .search_logs()
        .query("level:warn | limit 5")
        .options(options)
        .call()
        .await?;
    println!("{} warning lines", logs.len());

    // Endpoints without a dedicated method still go through the chain
    let response = client
        .request(Method::GET, "/api/monitors/silences")
        .with_extension(RequestOptions::new().traceparent(""))
        .send()
        .await?;
    println!("Silences: {}", response.status());

    Ok(())
}
