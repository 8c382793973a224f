use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

use crate::domain::Repository;

/// Creates a Redis-backed repository whose keys live under `namespace:`.
///
/// Values are stored as JSON strings. No connection is made until the first
/// operation.
pub fn create_redis_repository<V>(
    client: Client,
    namespace: &str,
) -> crate::domain::RepositoryPtr<V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // ---
    std::sync::Arc::new(RedisRepository::new(client, namespace))
}

pub struct RedisRepository<V> {
    // ---
    client: Client,
    namespace: String,
    _value: PhantomData<fn() -> V>,
}

impl<V> RedisRepository<V> {
    // ---
    pub fn new(client: Client, namespace: &str) -> Self {
        // ---
        Self {
            client,
            namespace: namespace.to_string(),
            _value: PhantomData,
        }
    }

    fn key(&self, key: &str) -> String {
        // ---
        format!("{}:{}", self.namespace, key)
    }

    /// Creates a new multiplexed Redis connection.
    async fn get_conn(&self) -> Result<MultiplexedConnection> {
        // ---
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                err
            })
            .context("redis connection failed")
    }
}

#[async_trait::async_trait]
impl<V> Repository<V> for RedisRepository<V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // ---
    async fn get(&self, key: &str) -> Result<Option<V>> {
        // ---
        let mut conn = self.get_conn().await?;
        let raw: Option<String> = conn.get(self.key(key)).await?;

        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .with_context(|| format!("corrupt value under {}", self.key(key)))
    }

    async fn put(&self, key: &str, value: V) -> Result<()> {
        // ---
        let json = serde_json::to_string(&value)?;
        let mut conn = self.get_conn().await?;
        conn.set::<_, _, ()>(self.key(key), json).await?;
        Ok(())
    }

    async fn put_if_absent(&self, key: &str, value: V) -> Result<bool> {
        // ---
        let json = serde_json::to_string(&value)?;
        let mut conn = self.get_conn().await?;
        let written: bool = conn.set_nx(self.key(key), json).await?;
        Ok(written)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        // ---
        let mut conn = self.get_conn().await?;
        let deleted: u64 = conn.del(self.key(key)).await?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<usize> {
        // ---
        let mut conn = self.get_conn().await?;
        let keys: Vec<String> = conn.keys(format!("{}:*", self.namespace)).await?;
        Ok(keys.len())
    }
}
