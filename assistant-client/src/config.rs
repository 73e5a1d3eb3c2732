//! Engine client configuration: endpoint, protocol version, and credentials.

use anyhow::{Context, Result};
use std::env;

/// Public endpoint of the dialogue service; used when no URL is configured.
pub const DEFAULT_URL: &str = "https://api.us-south.assistant.watson.cloud.ibm.com";

/// Credentials for the dialogue service.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Username/password basic auth.
    Basic { username: String, password: String },
    /// API key, sent as basic auth with the `apikey` username.
    ApiKey(String),
    /// Pre-obtained bearer token.
    BearerToken(String),
}

impl Credentials {
    /// Masked form for logging; never exposes more than the edges of the secret.
    pub fn masked(&self) -> String {
        let mask = |secret: &str| {
            if secret.len() <= 8 {
                "***".to_string()
            } else {
                format!("{}***{}", &secret[..4], &secret[secret.len() - 2..])
            }
        };
        match self {
            Credentials::Basic { username, .. } => format!("basic:{}:***", username),
            Credentials::ApiKey(key) => format!("apikey:{}", mask(key)),
            Credentials::BearerToken(token) => format!("bearer:{}", mask(token)),
        }
    }
}

/// Connection settings for the dialogue service.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Service base URL; the client appends the `/v1/...` paths.
    pub url: String,
    /// Protocol version date passed on every request, e.g. "2019-02-28".
    pub version: String,
    pub credentials: Credentials,
}

impl AssistantConfig {
    /// Creates a config against the public endpoint.
    pub fn new(version: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            version: version.into(),
            credentials,
        }
    }

    /// Overrides the service base URL (private endpoints, proxies, tests).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Loads the config from environment variables: `ASSISTANT_VERSION` (required), one of
    /// `ASSISTANT_APIKEY`, `ASSISTANT_USERNAME`/`ASSISTANT_PASSWORD`, or
    /// `ASSISTANT_BEARER_TOKEN` (required), and optional `ASSISTANT_URL`.
    pub fn from_env() -> Result<Self> {
        let version = env::var("ASSISTANT_VERSION").context("ASSISTANT_VERSION not set")?;
        let credentials = if let Ok(apikey) = env::var("ASSISTANT_APIKEY") {
            Credentials::ApiKey(apikey)
        } else if let Ok(username) = env::var("ASSISTANT_USERNAME") {
            let password = env::var("ASSISTANT_PASSWORD")
                .context("ASSISTANT_USERNAME set but ASSISTANT_PASSWORD not set")?;
            Credentials::Basic { username, password }
        } else if let Ok(token) = env::var("ASSISTANT_BEARER_TOKEN") {
            Credentials::BearerToken(token)
        } else {
            anyhow::bail!(
                "No credentials: set ASSISTANT_APIKEY, ASSISTANT_USERNAME/ASSISTANT_PASSWORD, \
                 or ASSISTANT_BEARER_TOKEN"
            );
        };
        let url = env::var("ASSISTANT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Ok(Self {
            url,
            version,
            credentials,
        })
    }
}
