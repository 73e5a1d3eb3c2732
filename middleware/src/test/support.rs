//! Test doubles: an injectable storage with failure switches and a canned engine client that
//! records the requests it receives.

use assistant_client::DialogueClient;
use assistant_core::error::{AssistantError, Result};
use assistant_core::types::{MessageParams, MessageResponse, OutputData, TurnMessage};
use assistant_core::Storage;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory storage with switches to fail reads or writes.
#[derive(Default)]
pub struct MockStorage {
    records: Mutex<HashMap<String, Value>>,
    fail_reads: bool,
    fail_writes: bool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seeds a record under its raw storage key, e.g. "user.U1".
    pub fn seed(&self, key: &str, record: Value) {
        self.records.lock().unwrap().insert(key.to_string(), record);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.records.lock().unwrap().get(key).cloned()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn read(&self, keys: &[String]) -> std::result::Result<HashMap<String, Value>, anyhow::Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            anyhow::bail!("injected read failure");
        }
        let records = self.records.lock().unwrap();
        Ok(keys
            .iter()
            .filter_map(|key| records.get(key).map(|value| (key.clone(), value.clone())))
            .collect())
    }

    async fn write(&self, changes: HashMap<String, Value>) -> std::result::Result<(), anyhow::Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            anyhow::bail!("injected write failure");
        }
        let mut records = self.records.lock().unwrap();
        for (key, value) in changes {
            records.insert(key, value);
        }
        Ok(())
    }
}

/// Engine client double: replies with a canned response (or a canned failure) and records every
/// request and deletion call.
#[derive(Default)]
pub struct MockClient {
    response: MessageResponse,
    fail_message: bool,
    delete_failure_code: Option<u16>,
    pub requests: Mutex<Vec<MessageParams>>,
    pub delete_calls: Mutex<Vec<String>>,
}

impl MockClient {
    pub fn with_response(response: MessageResponse) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    /// Canned reply with the given output text and context.
    pub fn replying(text: &str, context: Value) -> Self {
        Self::with_response(MessageResponse {
            output: OutputData {
                text: vec![text.to_string()],
                ..OutputData::default()
            },
            context: Some(context),
            ..MessageResponse::default()
        })
    }

    pub fn failing() -> Self {
        Self {
            fail_message: true,
            ..Self::default()
        }
    }

    pub fn failing_deletes(code: u16) -> Self {
        Self {
            delete_failure_code: Some(code),
            ..Self::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<MessageParams> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DialogueClient for MockClient {
    async fn message(&self, params: &MessageParams) -> Result<MessageResponse> {
        self.requests.lock().unwrap().push(params.clone());
        if self.fail_message {
            return Err(AssistantError::Engine("injected engine failure".to_string()));
        }
        Ok(self.response.clone())
    }

    async fn delete_user_data(&self, customer_id: &str) -> Result<()> {
        self.delete_calls
            .lock()
            .unwrap()
            .push(customer_id.to_string());
        if let Some(code) = self.delete_failure_code {
            return Err(AssistantError::DeleteUserData {
                code,
                message: "injected deletion failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Builds a plain conversational message from the given user with the given text.
pub fn create_test_message(user: &str, text: &str) -> TurnMessage {
    TurnMessage {
        text: Some(text.to_string()),
        user: user.to_string(),
        message_type: "message".to_string(),
        ..TurnMessage::default()
    }
}
