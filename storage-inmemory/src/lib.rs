//! # In-memory storage
//!
//! In-memory implementation of the [`Storage`] trait from assistant-core. Records live in a
//! `HashMap` behind an `Arc<RwLock<>>`, so clones share the same data and access is safe across
//! tasks. Data is lost on restart; intended for tests, development, and small embedded bots.

use assistant_core::Storage;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory key-value store for user records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl InMemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, Value>, anyhow::Error> {
        let records = self.records.read().await;
        let found: HashMap<String, Value> = keys
            .iter()
            .filter_map(|key| records.get(key).map(|value| (key.clone(), value.clone())))
            .collect();
        debug!(requested = keys.len(), found = found.len(), "storage read");
        Ok(found)
    }

    async fn write(&self, changes: HashMap<String, Value>) -> Result<(), anyhow::Error> {
        let mut records = self.records.write().await;
        debug!(changed = changes.len(), "storage write");
        for (key, value) in changes {
            records.insert(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_then_read_returns_record() {
        let store = InMemoryStorage::new();
        let mut changes = HashMap::new();
        changes.insert("user.U1".to_string(), json!({"id": "U1", "context": {"a": 1}}));
        store.write(changes).await.unwrap();

        let result = store.read(&["user.U1".to_string()]).await.unwrap();
        assert_eq!(result["user.U1"]["context"]["a"], 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_read_missing_key_is_omitted() {
        let store = InMemoryStorage::new();
        let result = store.read(&["user.missing".to_string()]).await.unwrap();
        assert!(result.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_record() {
        let store = InMemoryStorage::new();
        let key = "user.U1".to_string();
        let mut first = HashMap::new();
        first.insert(key.clone(), json!({"context": {"turn": 1}}));
        store.write(first).await.unwrap();
        let mut second = HashMap::new();
        second.insert(key.clone(), json!({"context": {"turn": 2}}));
        store.write(second).await.unwrap();

        let result = store.read(std::slice::from_ref(&key)).await.unwrap();
        assert_eq!(result[&key]["context"]["turn"], 2);
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = InMemoryStorage::new();
        let clone = store.clone();
        let mut changes = HashMap::new();
        changes.insert("user.U1".to_string(), json!({"id": "U1"}));
        store.write(changes).await.unwrap();

        let result = clone.read(&["user.U1".to_string()]).await.unwrap();
        assert_eq!(result["user.U1"]["id"], "U1");
    }
}
