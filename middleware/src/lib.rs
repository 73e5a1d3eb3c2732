//! # Dialogue-engine middleware
//!
//! Connects a chat-bot framework's message pipeline to a remote dialogue engine. Per inbound
//! message: read the user's stored conversation context, shape a request (sanitized text plus a
//! deep-merged caller context delta), post it to the engine, persist the returned context, and
//! attach the response to the message.
//!
//! The middleware never fails a turn: hard errors from storage or the engine are caught at the
//! orchestration boundary and recorded on the message as `response_error`, so the hosting
//! framework's pipeline always receives the message in a well-defined state.

mod assistant_middleware;
mod config;
pub mod utils;

#[cfg(test)]
mod test;

pub use assistant_middleware::{AfterHook, AssistantMiddleware, BeforeHook};
pub use config::{MiddlewareConfig, DEFAULT_IGNORE_TYPES, DEFAULT_MINIMUM_CONFIDENCE};
