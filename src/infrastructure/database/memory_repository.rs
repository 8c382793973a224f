use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::Repository;

/// Creates an empty process-local repository.
///
/// Contents are lost when the process exits.
pub fn create_memory_repository<V>() -> crate::domain::RepositoryPtr<V>
where
    V: Clone + Send + Sync + 'static,
{
    // ---
    std::sync::Arc::new(MemoryRepository::new())
}

pub struct MemoryRepository<V> {
    // ---
    entries: RwLock<HashMap<String, V>>,
}

impl<V> MemoryRepository<V> {
    // ---
    pub fn new() -> Self {
        // ---
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryRepository<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl<V> Repository<V> for MemoryRepository<V>
where
    V: Clone + Send + Sync + 'static,
{
    // ---
    async fn get(&self, key: &str) -> Result<Option<V>> {
        // ---
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: V) -> Result<()> {
        // ---
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: V) -> Result<bool> {
        // ---
        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value);
        Ok(true)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        // ---
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn count(&self) -> Result<usize> {
        // ---
        Ok(self.entries.read().await.len())
    }
}
