//! Context store helpers, request shaping, and the response relay.
//!
//! These are the free functions the orchestrator sequences: read and update the per-user context
//! record, sanitize input text, deep-merge a caller context delta, and post the request to the
//! engine.

use assistant_client::DialogueClient;
use assistant_core::error::{AssistantError, Result};
use assistant_core::types::{MessageParams, MessageResponse};
use assistant_core::Storage;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;

/// Storage keys are `"user." + user_id`.
pub const STORAGE_PREFIX: &str = "user.";

fn item_id(user_id: &str) -> String {
    format!("{}{}", STORAGE_PREFIX, user_id)
}

/// Reads the stored context for a user. Storage read errors are swallowed: a user whose read
/// transiently fails starts a fresh conversation instead of failing the turn.
pub async fn read_context(user_id: &str, storage: &dyn Storage) -> Option<Value> {
    let key = item_id(user_id);
    match storage.read(std::slice::from_ref(&key)).await {
        Ok(mut records) => {
            let context = records
                .remove(&key)
                .and_then(|record| record.get("context").cloned())
                .filter(|context| !context.is_null());
            if let Some(context) = &context {
                debug!(user = %user_id, context = %context, "read stored context");
            }
            context
        }
        Err(err) => {
            debug!(user = %user_id, error = %err, "context read failed, starting fresh");
            None
        }
    }
}

/// Read-modify-write of a user's record: overwrites only `id` and `context`, preserving sibling
/// fields callers keep in the same record. Read errors are tolerated (treated as no existing
/// record); write errors are propagated so a failed persist is visible to the orchestrator.
///
/// There is no compare-and-swap: concurrent turns for the same user race here and the last
/// write wins.
pub async fn update_context(
    user_id: &str,
    storage: &dyn Storage,
    context: &Value,
) -> Result<()> {
    let key = item_id(user_id);

    let mut record = match storage.read(std::slice::from_ref(&key)).await {
        Ok(mut records) => records.remove(&key).unwrap_or_else(|| json!({})),
        Err(err) => {
            debug!(user = %user_id, error = %err, "record read failed, creating a new record");
            json!({})
        }
    };
    if !record.is_object() {
        record = json!({});
    }
    record["id"] = json!(user_id);
    record["context"] = context.clone();

    let mut changes = HashMap::new();
    changes.insert(key, record);
    storage
        .write(changes)
        .await
        .map_err(|e| AssistantError::Storage(e.to_string()))
}

/// Replaces tab, newline, and carriage-return characters with a single space each; the engine
/// forbids them in input text.
pub fn sanitize_text(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

/// Recursively merges `delta` into `base`. Objects merge key-by-key; any other delta value
/// (scalar, array, or explicit `null`) replaces the base value. Keys present only in the base
/// survive; keys present only in the delta are added.
pub fn deep_merge(base: &Value, delta: &Value) -> Value {
    match (base, delta) {
        (Value::Object(base_map), Value::Object(delta_map)) => {
            let mut merged = base_map.clone();
            for (key, delta_value) in delta_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_merge(base_value, delta_value),
                    None => delta_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        _ => delta.clone(),
    }
}

/// Posts one turn to the engine. Thin pass-through: transport and HTTP errors surface unchanged
/// to the caller.
pub async fn post_message(
    client: &dyn DialogueClient,
    params: &MessageParams,
) -> Result<MessageResponse> {
    debug!(
        request = %serde_json::to_string(params).unwrap_or_default(),
        workspace_id = %params.workspace_id,
        "engine request"
    );
    let response = client.message(params).await?;
    debug!(
        response = %serde_json::to_string(&response).unwrap_or_default(),
        "engine response"
    );
    Ok(response)
}
