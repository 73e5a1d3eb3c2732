//! Middleware configuration.

use anyhow::{Context, Result};
use assistant_client::AssistantConfig;
use assistant_core::Storage;
use std::env;
use std::sync::Arc;

/// Minimum intent confidence for [`hear`](crate::AssistantMiddleware::hear) when none is configured.
pub const DEFAULT_MINIMUM_CONFIDENCE: f64 = 0.75;

/// Event types initiated by the chat platform itself, not the end user. Never forwarded.
pub const DEFAULT_IGNORE_TYPES: &[&str] = &["presence_change", "reconnect_url"];

/// Settings for [`AssistantMiddleware`](crate::AssistantMiddleware).
#[derive(Clone)]
pub struct MiddlewareConfig {
    /// Default target workspace for every turn. A 36-char `workspace_id` inside the merged
    /// context overrides it per request.
    pub workspace_id: String,
    /// Connection settings for the dialogue engine.
    pub assistant: AssistantConfig,
    /// Minimum intent confidence for `hear`; defaults to [`DEFAULT_MINIMUM_CONFIDENCE`].
    pub minimum_confidence: Option<f64>,
    /// Event types to short-circuit; defaults to [`DEFAULT_IGNORE_TYPES`].
    pub ignore_types: Option<Vec<String>>,
    /// Pre-bound storage handle. When unset, the handle passed to the first `receive` call is
    /// cached for later direct context access.
    pub storage: Option<Arc<dyn Storage>>,
}

impl MiddlewareConfig {
    /// Creates a config with defaults for confidence, ignore types, and storage.
    pub fn new(workspace_id: impl Into<String>, assistant: AssistantConfig) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            assistant,
            minimum_confidence: None,
            ignore_types: None,
            storage: None,
        }
    }

    pub fn with_minimum_confidence(mut self, minimum_confidence: f64) -> Self {
        self.minimum_confidence = Some(minimum_confidence);
        self
    }

    pub fn with_ignore_types(mut self, ignore_types: Vec<String>) -> Self {
        self.ignore_types = Some(ignore_types);
        self
    }

    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Loads the config from environment variables: `ASSISTANT_WORKSPACE_ID` (required), the
    /// engine client variables (see [`AssistantConfig::from_env`]), and optional
    /// `ASSISTANT_MINIMUM_CONFIDENCE`.
    pub fn from_env() -> Result<Self> {
        let workspace_id =
            env::var("ASSISTANT_WORKSPACE_ID").context("ASSISTANT_WORKSPACE_ID not set")?;
        let assistant = AssistantConfig::from_env()?;
        let minimum_confidence = env::var("ASSISTANT_MINIMUM_CONFIDENCE")
            .ok()
            .map(|s| {
                s.parse::<f64>()
                    .context("ASSISTANT_MINIMUM_CONFIDENCE is not a number")
            })
            .transpose()?;
        Ok(Self {
            workspace_id,
            assistant,
            minimum_confidence,
            ignore_types: None,
            storage: None,
        })
    }
}
