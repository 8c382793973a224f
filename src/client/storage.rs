//! Persisted key-value storage for the client.
//!
//! Mirrors the browser's local storage: string values under fixed keys.
//! [`FileStorage`] keeps one file per key in a directory; [`MemoryStorage`]
//! is for tests and ephemeral sessions.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Storage key for the JSON-serialized favorites sequence.
pub const FAVORITES_KEY: &str = "got-favorites";

/// Storage key for the session token.
pub const TOKEN_KEY: &str = "got-auth-token";

/// Storage key for the JSON-serialized current user.
pub const USER_KEY: &str = "got-user";

#[async_trait::async_trait]
pub trait LocalStorage: Send + Sync {
    // ---
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<()>;
}

pub type LocalStoragePtr = Arc<dyn LocalStorage>;

/// One file per key under a directory.
pub struct FileStorage {
    // ---
    dir: PathBuf,
}

impl FileStorage {
    // ---
    /// The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

#[async_trait::async_trait]
impl LocalStorage for FileStorage {
    // ---
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        // ---
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path(key).display())),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // ---
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating {}", self.dir.display()))?;
        tokio::fs::write(self.path(key), value)
            .await
            .with_context(|| format!("writing {}", self.path(key).display()))
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        // ---
        match tokio::fs::remove_file(self.path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", self.path(key).display())),
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    // ---
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LocalStorage for MemoryStorage {
    // ---
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock().await.remove(key);
        Ok(())
    }
}
