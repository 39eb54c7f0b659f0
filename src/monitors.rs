//! Monitors and silences
//!
//! Monitor definitions are served as YAML. The body is returned untouched so
//! callers can parse it with the YAML library of their choice.

use bon::bon;
use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use crate::base_url::id_segment;
use crate::client::GroundcoverClient;
use crate::error::Result;
use crate::models::DeleteSilenceRequest;
use crate::options::RequestOptions;
use crate::response::{discard, read_json, read_yaml_bytes};

pub const MONITORS_PATH: &str = "/api/monitors";
pub const SILENCES_PATH: &str = "/api/monitors/silences";

fn monitor_path(id: &str) -> Result<String> {
    Ok(format!("{}/{}", MONITORS_PATH, id_segment("monitor", id)?))
}

#[bon]
impl GroundcoverClient {
    /// Fetch a monitor definition as raw YAML
    #[builder]
    pub async fn get_monitor(
        &self,
        #[builder(start_fn, into)] id: String,
        options: Option<RequestOptions>,
    ) -> Result<Bytes> {
        let path = monitor_path(&id)?;
        let response = self.send_empty(Method::GET, &path, options).await?;
        read_yaml_bytes(response).await
    }

    /// Delete a monitor
    #[builder]
    pub async fn delete_monitor(
        &self,
        #[builder(start_fn, into)] id: String,
        options: Option<RequestOptions>,
    ) -> Result<()> {
        let path = monitor_path(&id)?;
        let response = self.send_empty(Method::DELETE, &path, options).await?;
        discard(response).await
    }

    /// List active silences
    #[builder]
    pub async fn list_silences(&self, options: Option<RequestOptions>) -> Result<Value> {
        let response = self.send_empty(Method::GET, SILENCES_PATH, options).await?;
        read_json(response).await
    }

    /// Delete a silence by its UUID
    #[builder]
    pub async fn delete_silence(
        &self,
        #[builder(start_fn)] id: Uuid,
        options: Option<RequestOptions>,
    ) -> Result<()> {
        let request = DeleteSilenceRequest { id };
        let response = self
            .send_json(Method::DELETE, SILENCES_PATH, &request, options)
            .await?;
        discard(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_path() {
        assert_eq!(monitor_path("m-1").unwrap(), "/api/monitors/m-1");
        assert!(monitor_path("").is_err());
        assert!(monitor_path("a/b").is_err());
        assert!(monitor_path("..").is_err());
    }
}
