use super::{FavoritesSource, Synced};
use crate::client::{endpoint, expect_success, parse_api_root};
use crate::client::storage::{LocalStoragePtr, TOKEN_KEY};
use crate::domain::Character;
use anyhow::Result;
use reqwest::{Client, RequestBuilder, Url};

/// Favorites held by the service, reached over HTTP.
///
/// The bearer token is read from local storage on every request, so a login
/// or logout takes effect without rebuilding the source.
pub struct RemoteFavorites {
    // ---
    http: Client,
    base_url: Url,
    storage: LocalStoragePtr,
}

impl RemoteFavorites {
    // ---
    /// `base_url` is the API root, e.g. `http://localhost:3000/api`.
    pub fn new(http: Client, base_url: &str, storage: LocalStoragePtr) -> Result<Self> {
        // ---
        Ok(Self {
            http,
            base_url: parse_api_root(base_url)?,
            storage,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        endpoint(&self.base_url, segments)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        // ---
        let request = match self.storage.get_item(TOKEN_KEY).await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        expect_success(request.send().await?).await
    }
}

#[async_trait::async_trait]
impl FavoritesSource for RemoteFavorites {
    // ---
    async fn list(&self) -> Result<Vec<Character>> {
        // ---
        let response = self
            .send(self.http.get(self.endpoint(&["favorites"])))
            .await?;
        Ok(response.json().await?)
    }

    async fn add(&self, character: &Character) -> Result<Synced> {
        // ---
        self.send(self.http.post(self.endpoint(&["favorites"])).json(character))
            .await?;
        Ok(Synced::Confirmed)
    }

    async fn remove(&self, url: &str) -> Result<Synced> {
        // ---
        self.send(self.http.delete(self.endpoint(&["favorites", url])))
            .await?;
        Ok(Synced::Confirmed)
    }

    async fn clear(&self) -> Result<Synced> {
        // ---
        self.send(self.http.delete(self.endpoint(&["favorites"])))
            .await?;
        Ok(Synced::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::client::storage::MemoryStorage;
    use std::sync::Arc;

    fn remote(base: &str) -> RemoteFavorites {
        RemoteFavorites::new(Client::new(), base, Arc::new(MemoryStorage::new())).unwrap()
    }

    #[test]
    fn character_url_is_one_encoded_segment() {
        // ---
        let remote = remote("http://localhost:3000/api");
        let url = remote.endpoint(&[
            "favorites",
            "https://anapioficeandfire.com/api/characters/583",
        ]);

        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/favorites/https:%2F%2Fanapioficeandfire.com%2Fapi%2Fcharacters%2F583"
        );
    }

    #[test]
    fn trailing_slash_on_root_is_tolerated() {
        // ---
        let remote = remote("http://localhost:3000/api/");
        assert_eq!(
            remote.endpoint(&["favorites"]).as_str(),
            "http://localhost:3000/api/favorites"
        );
    }

    #[test]
    fn non_base_url_is_rejected() {
        // ---
        assert!(RemoteFavorites::new(
            Client::new(),
            "mailto:someone@example.com",
            Arc::new(MemoryStorage::new())
        )
        .is_err());
    }
}
