use crate::core::storage::KeyValueStorage;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory storage, used in tests and when no data directory is available
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.inner.lock().await;
        let value = entries.get(key).cloned();
        if value.is_some() {
            debug!("Storage HIT for key: {}", key);
        } else {
            debug!("Storage MISS for key: {}", key);
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.inner.lock().await;
        debug!("Storage PUT for key: {}", key);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_storage_get_set() {
        let storage = MemoryStorage::new();

        // Initially, storage is empty
        assert!(storage.get("key1").await.unwrap().is_none());

        storage.set("key1", "USD").await.unwrap();
        assert_eq!(storage.get("key1").await.unwrap().as_deref(), Some("USD"));

        // Overwrite replaces the full value
        storage.set("key1", "EUR").await.unwrap();
        assert_eq!(storage.get("key1").await.unwrap().as_deref(), Some("EUR"));

        assert!(storage.get("key2").await.unwrap().is_none());
    }
}
