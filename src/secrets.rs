//! Secret management

use bon::bon;
use reqwest::Method;

use crate::base_url::id_segment;
use crate::client::GroundcoverClient;
use crate::error::{Error, Result};
use crate::models::{CreateSecretRequest, SecretResponse, UpdateSecretRequest};
use crate::options::RequestOptions;
use crate::response::{discard, read_json};
use crate::security::SecretString;

pub const SECRETS_PATH: &str = "/api/secrets";

fn secret_path(id: &str) -> Result<String> {
    Ok(format!("{}/{}", SECRETS_PATH, id_segment("secret", id)?))
}

#[bon]
impl GroundcoverClient {
    /// Store a new secret
    #[builder]
    pub async fn create_secret(
        &self,
        #[builder(into)] name: String,
        #[builder(into)] secret_type: String,
        #[builder(into)] content: SecretString,
        options: Option<RequestOptions>,
    ) -> Result<SecretResponse> {
        if name.is_empty() || content.is_empty() {
            return Err(Error::Validation(
                "secret name and content are required".to_string(),
            ));
        }

        let request = CreateSecretRequest {
            name,
            secret_type,
            content: content.expose_secret().to_string(),
        };
        let response = self
            .send_json(Method::POST, SECRETS_PATH, &request, options)
            .await?;
        read_json(response).await
    }

    /// Update the fields of an existing secret that are set
    #[builder]
    pub async fn update_secret(
        &self,
        #[builder(start_fn, into)] id: String,
        #[builder(into)] name: Option<String>,
        #[builder(into)] secret_type: Option<String>,
        #[builder(into)] content: Option<SecretString>,
        options: Option<RequestOptions>,
    ) -> Result<SecretResponse> {
        let path = secret_path(&id)?;
        let request = UpdateSecretRequest {
            name,
            secret_type,
            content: content.map(|c| c.expose_secret().to_string()),
        };
        let response = self.send_json(Method::PUT, &path, &request, options).await?;
        read_json(response).await
    }

    /// Delete a secret
    #[builder]
    pub async fn delete_secret(
        &self,
        #[builder(start_fn, into)] id: String,
        options: Option<RequestOptions>,
    ) -> Result<()> {
        let path = secret_path(&id)?;
        let response = self.send_empty(Method::DELETE, &path, options).await?;
        discard(response).await
    }
}
