//! Logs and events search

use bon::bon;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;

use crate::client::GroundcoverClient;
use crate::error::{Error, Result};
use crate::models::{EventsSearchRequest, LogsSearchRequest};
use crate::options::RequestOptions;
use crate::response::read_json;

pub const LOGS_SEARCH_PATH: &str = "/api/logs/search";
pub const EVENTS_SEARCH_PATH: &str = "/api/events/search";

/// Window used when no start time is given
const DEFAULT_LOOKBACK: chrono::Duration = chrono::Duration::hours(1);

fn search_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let end = end.unwrap_or_else(Utc::now);
    let start = start.unwrap_or(end - DEFAULT_LOOKBACK);
    if start > end {
        return Err(Error::Validation(format!(
            "search start {} is after end {}",
            start, end
        )));
    }
    Ok((start, end))
}

#[bon]
impl GroundcoverClient {
    /// Search logs with a query such as `level:error | limit 10`.
    ///
    /// The window defaults to the last hour.
    #[builder]
    pub async fn search_logs(
        &self,
        #[builder(into)] query: String,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        options: Option<RequestOptions>,
    ) -> Result<Vec<Value>> {
        let (start, end) = search_window(start, end)?;
        let request = LogsSearchRequest { start, end, query };

        let response = self
            .send_json(Method::POST, LOGS_SEARCH_PATH, &request, options)
            .await?;
        read_json(response).await
    }

    /// Search Kubernetes and platform events.
    ///
    /// The window defaults to the last hour.
    #[builder]
    pub async fn search_events(
        &self,
        #[builder(into)] query: String,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        options: Option<RequestOptions>,
    ) -> Result<Vec<Value>> {
        let (start, end) = search_window(start, end)?;
        let request = EventsSearchRequest { start, end, query };

        let response = self
            .send_json(Method::POST, EVENTS_SEARCH_PATH, &request, options)
            .await?;
        read_json(response).await
    }
}
