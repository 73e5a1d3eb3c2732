//! # Dialogue engine client
//!
//! Defines the [`DialogueClient`] trait and [`AssistantClient`], an HTTP implementation of the
//! engine's v1 workspace protocol. The trait is object-safe so the middleware can take any
//! transport (or a mock) as `Arc<dyn DialogueClient>`.

use assistant_core::error::Result;
use assistant_core::types::{MessageParams, MessageResponse};
use async_trait::async_trait;

mod assistant;
mod config;

pub use assistant::AssistantClient;
pub use config::{AssistantConfig, Credentials, DEFAULT_URL};

/// Dialogue engine interface: one conversation turn, plus GDPR-style removal of a user's data
/// from the engine's own storage.
#[async_trait]
pub trait DialogueClient: Send + Sync {
    /// Sends one turn to the engine and returns its parsed response. Transport and HTTP errors
    /// surface unchanged; the caller decides how to handle them.
    async fn message(&self, params: &MessageParams) -> Result<MessageResponse>;

    /// Asks the engine to delete everything it stored for the given customer id. A non-success
    /// status becomes a descriptive error carrying that status code.
    async fn delete_user_data(&self, customer_id: &str) -> Result<()>;
}
