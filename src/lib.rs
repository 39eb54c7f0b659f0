//! Async Rust client for the groundcover API
//!
//! Requests go through a layered transport (see [`transport`]) that adds
//! authentication, optional gzip, trace propagation, endpoint content-type
//! fixes, and retries with jittered exponential backoff. Operations are
//! exposed as builders powered by the `bon` crate.
//!
//! ```no_run
//! use groundcover_client::GroundcoverClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GroundcoverClient::from_env()?;
//!
//! let nodes = client
//!     .query_metrics()
//!     .promql("count(groundcover_node_capacity_mem_bytes{})")
//!     .step("1m")
//!     .call()
//!     .await?;
//! println!("{nodes}");
//! # Ok(())
//! # }
//! ```

pub mod base_url;
pub mod client;
pub mod error;
pub mod metrics;
pub mod models;
pub mod monitors;
pub mod options;
mod response;
pub mod search;
pub mod secrets;
pub mod security;
pub mod transport;
pub mod workflows;

pub use base_url::normalize_base_url;
pub use client::GroundcoverClient;
pub use error::{Error, Result};
pub use options::RequestOptions;
pub use transport::RetryConfig;
