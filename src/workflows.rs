//! Workflows

use bon::bon;
use reqwest::Method;
use serde_json::Value;

use crate::client::GroundcoverClient;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::response::read_json;
use crate::transport::content_type::WORKFLOW_CREATE_PATH;

pub const WORKFLOWS_LIST_PATH: &str = "/api/workflows/list";

#[bon]
impl GroundcoverClient {
    /// Create a workflow from its YAML definition.
    ///
    /// The content type is assigned by the transport's content-type fix layer.
    #[builder]
    pub async fn create_workflow(
        &self,
        #[builder(start_fn, into)] yaml: String,
        options: Option<RequestOptions>,
    ) -> Result<Value> {
        if yaml.trim().is_empty() {
            return Err(Error::Validation(
                "workflow definition must not be empty".to_string(),
            ));
        }

        let builder = self
            .prepare(Method::POST, WORKFLOW_CREATE_PATH, options)
            .body(yaml);
        let response = self.send(builder).await?;
        read_json(response).await
    }

    /// List workflows
    #[builder]
    pub async fn list_workflows(&self, options: Option<RequestOptions>) -> Result<Value> {
        let response = self
            .send_empty(Method::GET, WORKFLOWS_LIST_PATH, options)
            .await?;
        read_json(response).await
    }
}
