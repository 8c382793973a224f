use super::{FavoritesSource, Synced};
use crate::client::storage::{LocalStoragePtr, FAVORITES_KEY};
use crate::domain::Character;
use anyhow::Result;

/// Favorites kept as a JSON array under [`FAVORITES_KEY`].
///
/// Adds are deduplicated by url and removals of absent urls are no-ops. An
/// unreadable cache is treated as empty.
pub struct LocalFavorites {
    // ---
    storage: LocalStoragePtr,
}

impl LocalFavorites {
    // ---
    pub fn new(storage: LocalStoragePtr) -> Self {
        Self { storage }
    }

    async fn load(&self) -> Vec<Character> {
        // ---
        let raw = match self.storage.get_item(FAVORITES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Error loading favorites from local storage: {:#}", e);
                return Vec::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::error!("Discarding unreadable favorites cache: {}", e);
            Vec::new()
        })
    }

    async fn save(&self, favorites: &[Character]) -> Result<()> {
        // ---
        let raw = serde_json::to_string(favorites)?;
        self.storage.set_item(FAVORITES_KEY, &raw).await
    }
}

#[async_trait::async_trait]
impl FavoritesSource for LocalFavorites {
    // ---
    async fn list(&self) -> Result<Vec<Character>> {
        Ok(self.load().await)
    }

    async fn add(&self, character: &Character) -> Result<Synced> {
        // ---
        let mut favorites = self.load().await;

        if !favorites.iter().any(|fav| fav.url == character.url) {
            favorites.push(character.clone());
            self.save(&favorites).await?;
        }

        Ok(Synced::Snapshot(favorites))
    }

    async fn remove(&self, url: &str) -> Result<Synced> {
        // ---
        let mut favorites = self.load().await;
        favorites.retain(|fav| fav.url != url);
        self.save(&favorites).await?;

        Ok(Synced::Snapshot(favorites))
    }

    async fn clear(&self) -> Result<Synced> {
        // ---
        self.storage.remove_item(FAVORITES_KEY).await?;
        Ok(Synced::Snapshot(Vec::new()))
    }
}
