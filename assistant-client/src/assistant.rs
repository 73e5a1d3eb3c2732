//! HTTP implementation of [`DialogueClient`] against the engine's v1 workspace API.

use crate::config::{AssistantConfig, Credentials};
use crate::DialogueClient;
use assistant_core::error::{AssistantError, Result};
use assistant_core::types::{MessageParams, MessageResponse};
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument};

/// HTTP client for the dialogue engine. Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl AssistantClient {
    /// Creates a client for the configured endpoint.
    pub fn new(config: AssistantConfig) -> Self {
        debug!(
            url = %config.url,
            version = %config.version,
            credentials = %config.credentials.masked(),
            "creating dialogue engine client"
        );
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.credentials {
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::ApiKey(key) => request.basic_auth("apikey", Some(key)),
            Credentials::BearerToken(token) => request.bearer_auth(token),
        }
    }
}

#[async_trait]
impl DialogueClient for AssistantClient {
    #[instrument(skip(self, params), fields(workspace_id = %params.workspace_id))]
    async fn message(&self, params: &MessageParams) -> Result<MessageResponse> {
        let url = format!(
            "{}/v1/workspaces/{}/message",
            self.base_url(),
            params.workspace_id
        );

        let response = self
            .authorize(self.client.post(&url))
            .query(&[("version", self.config.version.as_str())])
            .json(params)
            .send()
            .await
            .map_err(|e| AssistantError::Engine(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Engine(format!(
                "message request failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| AssistantError::Engine(format!("malformed engine response: {}", e)))
    }

    #[instrument(skip(self))]
    async fn delete_user_data(&self, customer_id: &str) -> Result<()> {
        let url = format!("{}/v1/user_data", self.base_url());

        let response = self
            .authorize(self.client.delete(&url))
            .query(&[
                ("version", self.config.version.as_str()),
                ("customer_id", customer_id),
            ])
            .send()
            .await
            .map_err(|e| AssistantError::Engine(e.to_string()))?;

        let status = response.status();
        // The protocol acknowledges deletions with 202 Accepted.
        if status != StatusCode::ACCEPTED {
            let message = response.text().await.unwrap_or_default();
            return Err(AssistantError::DeleteUserData {
                code: status.as_u16(),
                message,
            });
        }
        debug!(customer_id = %customer_id, "user data deletion accepted");
        Ok(())
    }
}
