//! Per-user favorites lists.
//!
//! The store keeps one ordered list of [`Character`] records per user id,
//! unique by `url`. It performs no authentication: callers resolve the user
//! id through [`crate::domain::AuthService::verify`] first.

use super::error::{AppError, AppResult};
use super::models::Character;
use super::repository::RepositoryPtr;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Clone)]
pub struct FavoritesStore {
    // ---
    lists: RepositoryPtr<Vec<Character>>,

    /// Serializes read-modify-write cycles inside this process.
    write_gate: Arc<Mutex<()>>,
}

impl FavoritesStore {
    // ---
    pub fn new(lists: RepositoryPtr<Vec<Character>>) -> Self {
        // ---
        Self {
            lists,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Creates an empty list for a newly registered user.
    pub async fn init(&self, user_id: Uuid) -> AppResult<()> {
        // ---
        self.lists.put_if_absent(&key(user_id), Vec::new()).await?;
        Ok(())
    }

    /// The user's favorites in insertion order; empty for unknown users.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Character>> {
        // ---
        Ok(self.lists.get(&key(user_id)).await?.unwrap_or_default())
    }

    /// Appends `character` unless its url is already present.
    pub async fn add(&self, user_id: Uuid, character: Character) -> AppResult<()> {
        // ---
        if character.url.trim().is_empty() {
            return Err(AppError::validation("Invalid character data"));
        }

        let _guard = self.write_gate.lock().await;
        let mut favorites = self.list(user_id).await?;

        if favorites.iter().any(|fav| fav.url == character.url) {
            return Err(AppError::conflict("Character already in favorites"));
        }

        tracing::debug!("Adding {} to favorites of {}", character.url, user_id);
        favorites.push(character);
        self.lists.put(&key(user_id), favorites).await?;

        Ok(())
    }

    /// Removes the character with `url`. Absent urls are not an error.
    pub async fn remove(&self, user_id: Uuid, url: &str) -> AppResult<bool> {
        // ---
        let _guard = self.write_gate.lock().await;
        let mut favorites = self.list(user_id).await?;

        let before = favorites.len();
        favorites.retain(|fav| fav.url != url);
        let removed = favorites.len() != before;

        self.lists.put(&key(user_id), favorites).await?;

        Ok(removed)
    }

    pub async fn clear(&self, user_id: Uuid) -> AppResult<()> {
        // ---
        let _guard = self.write_gate.lock().await;
        self.lists.put(&key(user_id), Vec::new()).await?;
        Ok(())
    }

    /// Number of stored lists, reported by the health endpoint.
    pub async fn count(&self) -> AppResult<usize> {
        // ---
        Ok(self.lists.count().await?)
    }
}

fn key(user_id: Uuid) -> String {
    // ---
    user_id.to_string()
}
