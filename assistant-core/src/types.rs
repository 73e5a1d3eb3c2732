//! Core types: turn message, engine request params, and engine response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One inbound chat event, mutated in place by the middleware. The chat framework creates it;
/// the middleware fills `response_data` (successful engine result) or `response_error` (failure).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnMessage {
    /// Raw user utterance. Absent or empty for platform-internal events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Stable user identifier; keys the stored conversation context.
    pub user: String,
    /// Event category, e.g. "message" or a platform-internal type like "presence_change".
    #[serde(rename = "type", default)]
    pub message_type: String,
    /// Reply-loop marker set by the chat framework; such messages are never forwarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    /// Bot-identity marker; set on self-echo messages, which are never forwarded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    /// Engine response for this turn, attached by the middleware.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<MessageResponse>,
    /// Error recorded for this turn: either an in-band engine error or a caught hard failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_error: Option<String>,
}

/// Outbound request to the dialogue engine.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MessageParams {
    /// Target workspace. Routes the request; not part of the serialized body.
    #[serde(skip_serializing)]
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<MessageInput>,
    /// Per-user conversation state, round-tripped opaquely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// User input for one turn. The engine forbids tab/newline/CR in `text`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageInput {
    pub text: String,
}

/// Engine response for one turn. Unknown fields round-trip via `additional`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub output: OutputData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<RuntimeIntent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<RuntimeEntity>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Engine output for one turn. `error` is a soft failure signaled in-band by the protocol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputData {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}

/// Recognized intent with its confidence score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeIntent {
    pub intent: String,
    pub confidence: f64,
}

/// Recognized entity; passed through to callers untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeEntity {
    pub entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub additional: Map<String, Value>,
}
