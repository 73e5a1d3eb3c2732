//! # assistant-core
//!
//! Core types and traits for the dialogue-engine middleware: [`TurnMessage`], engine request and
//! response types, the [`Storage`] trait, error types, and tracing initialization.
//! Transport-agnostic; used by assistant-client, storage-inmemory, and middleware.

pub mod error;
pub mod logger;
pub mod storage;
pub mod types;

pub use error::{AssistantError, Result};
pub use logger::init_tracing;
pub use storage::Storage;
pub use types::{
    MessageInput, MessageParams, MessageResponse, OutputData, RuntimeEntity, RuntimeIntent,
    TurnMessage,
};
