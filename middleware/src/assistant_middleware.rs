//! The per-turn orchestrator: filter, context fetch, request build, hooks, remote call, persist,
//! attach.

use crate::config::{MiddlewareConfig, DEFAULT_IGNORE_TYPES, DEFAULT_MINIMUM_CONFIDENCE};
use crate::utils;
use assistant_client::{AssistantClient, DialogueClient};
use assistant_core::error::{AssistantError, Result};
use assistant_core::types::{MessageInput, MessageParams, MessageResponse, TurnMessage};
use assistant_core::Storage;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Message type the chat framework uses for greeting events; forwarded even without text.
const WELCOME_TYPE: &str = "welcome";

/// Context-level workspace overrides must look like a well-formed id (a 36-char UUID).
const WORKSPACE_ID_LENGTH: usize = 36;

/// Type-erased async hook over the outbound request. The message is passed by value so the
/// returned future owns its data (boxed-callback pattern keeps the middleware object-safe to
/// compose). Default behavior without a hook is the identity transform.
pub type BeforeHook = Box<
    dyn Fn(TurnMessage, MessageParams) -> Pin<Box<dyn Future<Output = Result<MessageParams>> + Send>>
        + Send
        + Sync,
>;

/// Type-erased async hook over the engine response, applied before it is persisted and attached.
pub type AfterHook = Box<
    dyn Fn(
            TurnMessage,
            MessageResponse,
        ) -> Pin<Box<dyn Future<Output = Result<MessageResponse>> + Send>>
        + Send
        + Sync,
>;

/// Middleware between a chat framework and the dialogue engine.
///
/// One instance serves arbitrarily many concurrent turns; the engine client is shared and
/// stateless. The storage handle is cached from the config or the first `receive` call so the
/// direct context accessors can be used outside a turn.
pub struct AssistantMiddleware {
    workspace_id: String,
    minimum_confidence: f64,
    ignore_types: Vec<String>,
    client: Arc<dyn DialogueClient>,
    storage: RwLock<Option<Arc<dyn Storage>>>,
    before_hook: Option<BeforeHook>,
    after_hook: Option<AfterHook>,
}

impl AssistantMiddleware {
    /// Creates the middleware with an HTTP engine client built from the config.
    pub fn new(config: MiddlewareConfig) -> Self {
        let client: Arc<dyn DialogueClient> =
            Arc::new(AssistantClient::new(config.assistant.clone()));
        Self::from_parts(client, config)
    }

    /// Creates the middleware with a caller-supplied engine client (custom transports, tests).
    pub fn with_client(config: MiddlewareConfig, client: Arc<dyn DialogueClient>) -> Self {
        Self::from_parts(client, config)
    }

    fn from_parts(client: Arc<dyn DialogueClient>, config: MiddlewareConfig) -> Self {
        Self {
            workspace_id: config.workspace_id,
            minimum_confidence: config
                .minimum_confidence
                .unwrap_or(DEFAULT_MINIMUM_CONFIDENCE),
            ignore_types: config.ignore_types.unwrap_or_else(|| {
                DEFAULT_IGNORE_TYPES.iter().map(|t| t.to_string()).collect()
            }),
            client,
            storage: RwLock::new(config.storage),
            before_hook: None,
            after_hook: None,
        }
    }

    /// Installs a hook that may mutate the outbound request after it is built.
    pub fn with_before(mut self, hook: BeforeHook) -> Self {
        self.before_hook = Some(hook);
        self
    }

    /// Installs a hook that may mutate the engine response before persist and attach.
    pub fn with_after(mut self, hook: AfterHook) -> Self {
        self.after_hook = Some(hook);
        self
    }

    /// True if the attached response recognizes an intent named in `patterns` with confidence at
    /// or above the configured minimum. Lets callers branch without re-invoking the engine.
    pub fn hear(&self, patterns: &[String], message: &TurnMessage) -> bool {
        let Some(response) = &message.response_data else {
            return false;
        };
        response.intents.iter().any(|intent| {
            intent.confidence >= self.minimum_confidence
                && patterns.iter().any(|pattern| pattern == &intent.intent)
        })
    }

    /// Runs one turn for an inbound message. Non-conversational events short-circuit with an
    /// empty response; every failure in the turn is recorded on the message instead of returned,
    /// so the hosting pipeline is never blocked by a remote failure.
    #[instrument(skip_all, fields(user = %message.user, message_type = %message.message_type))]
    pub async fn send_to_assistant(
        &self,
        storage: &Arc<dyn Storage>,
        message: &mut TurnMessage,
        context_delta: Option<Value>,
    ) {
        if self.should_ignore(message) {
            debug!("platform-internal or echoed message, replying with empty output");
            message.response_data = Some(MessageResponse::default());
            return;
        }

        *self.storage.write().await = Some(Arc::clone(storage));

        if let Err(err) = self.run_turn(storage, message, context_delta).await {
            debug!(error = %err, "turn failed");
            message.response_error = Some(err.to_string());
        }
    }

    /// Runs one turn with no context delta. Entry point for the chat framework's receive pipeline.
    pub async fn receive(&self, storage: &Arc<dyn Storage>, message: &mut TurnMessage) {
        self.send_to_assistant(storage, message, None).await
    }

    /// Alias of [`receive`](Self::receive) for frameworks that name the hook `interpret`.
    pub async fn interpret(&self, storage: &Arc<dyn Storage>, message: &mut TurnMessage) {
        self.send_to_assistant(storage, message, None).await
    }

    /// Reads the stored context for a user directly. Fails if no storage handle has been
    /// established yet (no `receive` call and none pre-bound in the config).
    pub async fn read_context(&self, user: &str) -> Result<Option<Value>> {
        let storage = self.storage_handle("read_context").await?;
        Ok(utils::read_context(user, storage.as_ref()).await)
    }

    /// Replaces the stored context for a user directly, preserving sibling record fields.
    /// Fails if no storage handle has been established yet.
    pub async fn update_context(&self, user: &str, context: Value) -> Result<Value> {
        let storage = self.storage_handle("update_context").await?;
        utils::update_context(user, storage.as_ref(), &context).await?;
        Ok(context)
    }

    /// Deletes everything the remote engine stored for the given customer id. Local storage is
    /// untouched. Errors are propagated, not swallowed: this is invoked outside the turn flow.
    pub async fn delete_user_data(&self, customer_id: &str) -> Result<()> {
        self.client.delete_user_data(customer_id).await
    }

    fn should_ignore(&self, message: &TurnMessage) -> bool {
        let no_text = message.text.as_deref().map_or(true, str::is_empty);
        (no_text && message.message_type != WELCOME_TYPE)
            || self.ignore_types.contains(&message.message_type)
            || message.reply_to.is_some()
            || message.bot_id.is_some()
    }

    async fn run_turn(
        &self,
        storage: &Arc<dyn Storage>,
        message: &mut TurnMessage,
        context_delta: Option<Value>,
    ) -> Result<()> {
        let user_context = utils::read_context(&message.user, storage.as_ref()).await;

        let params = self.build_params(message, user_context, context_delta);
        let request = match &self.before_hook {
            Some(hook) => hook(message.clone(), params).await?,
            None => params,
        };

        let mut response = utils::post_message(self.client.as_ref(), &request).await?;
        if let Some(error) = &response.output.error {
            // Soft failure signaled in-band; record it but keep the response.
            debug!(error = %error, "engine returned in-band error");
            message.response_error = Some(error.clone());
        }
        response = match &self.after_hook {
            Some(hook) => hook(message.clone(), response).await?,
            None => response,
        };

        let context = response.context.clone().unwrap_or(Value::Null);
        utils::update_context(&message.user, storage.as_ref(), &context).await?;

        message.response_data = Some(response);
        Ok(())
    }

    fn build_params(
        &self,
        message: &TurnMessage,
        user_context: Option<Value>,
        context_delta: Option<Value>,
    ) -> MessageParams {
        let mut params = MessageParams {
            workspace_id: self.workspace_id.clone(),
            ..Default::default()
        };
        if let Some(text) = &message.text {
            params.input = Some(MessageInput {
                text: utils::sanitize_text(text),
            });
        }
        params.context = match (user_context, context_delta) {
            // First turn with a delta: the delta is the whole context.
            (None, Some(delta)) => Some(delta),
            (Some(context), Some(delta)) => Some(utils::deep_merge(&context, &delta)),
            (context, None) => context,
        };

        // A well-formed workspace id inside the context routes this single request elsewhere.
        if let Some(workspace_id) = params
            .context
            .as_ref()
            .and_then(|context| context.get("workspace_id"))
            .and_then(Value::as_str)
            .filter(|id| id.len() == WORKSPACE_ID_LENGTH)
        {
            params.workspace_id = workspace_id.to_string();
        }
        params
    }

    async fn storage_handle(&self, operation: &'static str) -> Result<Arc<dyn Storage>> {
        self.storage
            .read()
            .await
            .clone()
            .ok_or(AssistantError::StorageNotInitialized(operation))
    }
}
