use anyhow::Result;
use std::sync::Arc;

/// Key-value persistence capability.
///
/// Services are written against this trait so the in-memory backend can be
/// replaced by a durable store (Redis today) without touching callers.
/// Keys are opaque strings; each repository instance is its own namespace.
#[async_trait::async_trait]
pub trait Repository<V>: Send + Sync
where
    V: Send + Sync + 'static,
{
    // ---
    /// Get the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<V>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: V) -> Result<()>;

    /// Store `value` only if `key` is vacant. Returns `false` when the key
    /// was already taken, in which case nothing is written.
    async fn put_if_absent(&self, key: &str, value: V) -> Result<bool>;

    /// Delete `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Number of keys in this namespace.
    async fn count(&self) -> Result<usize>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr<V> = Arc<dyn Repository<V>>;
