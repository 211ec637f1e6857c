use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Asynchronous string key-value store holding the player's progress.
#[async_trait]
pub trait PersistentStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Process-local store, used by tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `set` fail until switched back
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PersistentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("Write rejected for {}", key);
        }
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("rewardBalance", "30".to_string()).await.unwrap();
        assert_eq!(store.get("rewardBalance").await.unwrap().as_deref(), Some("30"));

        store.set("rewardBalance", "50".to_string()).await.unwrap();
        assert_eq!(store.get("rewardBalance").await.unwrap().as_deref(), Some("50"));
        assert_eq!(store.entries.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_write_failures() {
        let store = MemoryStore::new();
        store.set("a", "1".to_string()).await.unwrap();

        store.set_fail_writes(true);
        assert!(store.set("a", "2".to_string()).await.is_err());
        // Reads still work and see the last good value
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));

        store.set_fail_writes(false);
        store.set("a", "2".to_string()).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));
    }
}
