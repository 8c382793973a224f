use super::{FavoritesSourcePtr, Synced};
use crate::domain::Character;
use anyhow::Result;
use futures::{stream, Stream};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// Favorites for the current session, kept in step with whichever source
/// is active.
///
/// In backend mode every operation goes to the remote source first and falls
/// back to the local one on any error. In local mode only the local source
/// is used. Successful operations publish the resulting list on a watch
/// channel that views subscribe to.
pub struct FavoritesClient {
    // ---
    remote: FavoritesSourcePtr,
    local: FavoritesSourcePtr,
    use_backend: AtomicBool,
    favorites: watch::Sender<Vec<Character>>,
}

impl FavoritesClient {
    // ---
    /// Starts in local mode with the cached list already published.
    pub async fn new(remote: FavoritesSourcePtr, local: FavoritesSourcePtr) -> Self {
        // ---
        let client = Self {
            remote,
            local,
            use_backend: AtomicBool::new(false),
            favorites: watch::Sender::new(Vec::new()),
        };
        client.reload_local().await;
        client
    }

    pub fn uses_backend(&self) -> bool {
        self.use_backend.load(Ordering::SeqCst)
    }

    /// Switches between the service and the local cache.
    ///
    /// Going local republishes the cached list, so views stop showing the
    /// account's favorites right away.
    pub async fn set_use_backend(&self, use_backend: bool) {
        // ---
        self.use_backend.store(use_backend, Ordering::SeqCst);
        tracing::debug!("Favorites backend mode: {}", use_backend);

        if !use_backend {
            self.reload_local().await;
        }
    }

    pub async fn get_favorites(&self) -> Result<Vec<Character>> {
        // ---
        let favorites = self
            .first_success("list", |source| async move { source.list().await })
            .await?;

        self.favorites.send_replace(favorites.clone());
        Ok(favorites)
    }

    pub async fn add_favorite(&self, character: &Character) -> Result<()> {
        // ---
        let synced = self
            .first_success("add", |source| async move { source.add(character).await })
            .await?;

        match synced {
            Synced::Confirmed => {
                self.favorites.send_if_modified(|favorites| {
                    if favorites.iter().any(|fav| fav.url == character.url) {
                        return false;
                    }
                    favorites.push(character.clone());
                    true
                });
            }
            Synced::Snapshot(favorites) => {
                self.favorites.send_replace(favorites);
            }
        }
        Ok(())
    }

    pub async fn remove_favorite(&self, url: &str) -> Result<()> {
        // ---
        let synced = self
            .first_success("remove", |source| async move { source.remove(url).await })
            .await?;

        match synced {
            Synced::Confirmed => {
                self.favorites.send_modify(|favorites| {
                    favorites.retain(|fav| fav.url != url);
                });
            }
            Synced::Snapshot(favorites) => {
                self.favorites.send_replace(favorites);
            }
        }
        Ok(())
    }

    pub async fn clear_favorites(&self) -> Result<()> {
        // ---
        let synced = self
            .first_success("clear", |source| async move { source.clear().await })
            .await?;

        match synced {
            Synced::Confirmed => {
                // The account is empty now; so is the local copy.
                if let Err(e) = self.local.clear().await {
                    tracing::error!("Error clearing local favorites: {:#}", e);
                }
                self.favorites.send_replace(Vec::new());
            }
            Synced::Snapshot(favorites) => {
                self.favorites.send_replace(favorites);
            }
        }
        Ok(())
    }

    /// Whether `url` is a favorite, re-emitted whenever the answer changes.
    ///
    /// Yields the current answer first. Performs no I/O.
    pub fn is_favorite(&self, url: &str) -> impl Stream<Item = bool> + Send + 'static {
        // ---
        let url = url.to_string();
        let rx = self.favorites.subscribe();

        stream::unfold((rx, None), move |(mut rx, last)| {
            let url = url.clone();
            async move {
                loop {
                    if last.is_some() {
                        rx.changed().await.ok()?;
                    }
                    let now = rx.borrow_and_update().iter().any(|fav| fav.url == url);
                    if last != Some(now) {
                        return Some((now, (rx, Some(now))));
                    }
                }
            }
        })
    }

    /// Snapshot check against the published list.
    pub fn contains(&self, url: &str) -> bool {
        self.favorites.borrow().iter().any(|fav| fav.url == url)
    }

    pub fn current(&self) -> Vec<Character> {
        self.favorites.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Character>> {
        self.favorites.subscribe()
    }

    /// Runs `op` against the remote source when in backend mode, and against
    /// the local source otherwise or when the remote call fails.
    async fn first_success<T, F, Fut>(&self, name: &str, op: F) -> Result<T>
    where
        F: Fn(FavoritesSourcePtr) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        // ---
        if self.uses_backend() {
            match op(self.remote.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!("Favorites {} failed on backend, using local cache: {:#}", name, e)
                }
            }
        }

        op(self.local.clone()).await
    }

    async fn reload_local(&self) {
        // ---
        match self.local.list().await {
            Ok(favorites) => {
                self.favorites.send_replace(favorites);
            }
            Err(e) => {
                tracing::error!("Error loading local favorites: {:#}", e);
                self.favorites.send_replace(Vec::new());
            }
        }
    }
}
