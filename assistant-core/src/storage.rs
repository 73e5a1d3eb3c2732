//! Key-value storage interface for per-user conversation state.
//!
//! The middleware stores one record per user under the key `"user." + user_id`. A record is an
//! opaque JSON object holding at least `id` and `context`; callers may keep sibling fields in the
//! same record and context updates must not remove them.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// Key-value storage for user records. Implementations map to a backend (in-memory, database,
/// or the hosting chat framework's own storage handle).
///
/// Updates are a plain read then write with no compare-and-swap, so two concurrent turns for the
/// same user race on the record; the last write wins.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the records for the given keys. Keys with no stored record are omitted from the
    /// returned map.
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, anyhow::Error>;

    /// Writes each record under its key, overwriting any existing record.
    async fn write(&self, changes: HashMap<String, Value>) -> Result<(), anyhow::Error>;
}
