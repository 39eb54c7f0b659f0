//! Metrics queries

use bon::bon;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;

use crate::client::GroundcoverClient;
use crate::error::{Error, Result};
use crate::models::{Condition, QueryRequest};
use crate::options::RequestOptions;
use crate::response::read_json;

pub const METRICS_QUERY_PATH: &str = "/api/metrics/query";

pub const QUERY_TYPE_INSTANT: &str = "instant";
pub const QUERY_TYPE_RANGE: &str = "range";

/// Window used when no start time is given
const DEFAULT_LOOKBACK: chrono::Duration = chrono::Duration::minutes(5);

#[bon]
impl GroundcoverClient {
    /// Run a PromQL query.
    ///
    /// `end` defaults to now and `start` to five minutes before `end`.
    #[builder]
    pub async fn query_metrics(
        &self,
        #[builder(into)] promql: String,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        #[builder(into)] step: Option<String>,
        #[builder(into, default = QUERY_TYPE_INSTANT.to_string())] query_type: String,
        #[builder(into)] filters: Option<String>,
        #[builder(default)] conditions: Vec<Condition>,
        options: Option<RequestOptions>,
    ) -> Result<Value> {
        if promql.trim().is_empty() {
            return Err(Error::Validation("PromQL query must not be empty".to_string()));
        }

        let end = end.unwrap_or_else(Utc::now);
        let start = start.unwrap_or(end - DEFAULT_LOOKBACK);
        if start > end {
            return Err(Error::Validation(format!(
                "query start {} is after end {}",
                start, end
            )));
        }

        let request = QueryRequest {
            conditions,
            start: Some(start),
            end: Some(end),
            filters,
            promql: Some(promql),
            query_type: Some(query_type),
            step,
        };

        let response = self
            .send_json(Method::POST, METRICS_QUERY_PATH, &request, options)
            .await?;
        read_json(response).await
    }
}
