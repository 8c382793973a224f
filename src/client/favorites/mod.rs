//! Favorites client service.
//!
//! Two interchangeable [`FavoritesSource`] strategies, [`RemoteFavorites`]
//! over HTTP and [`LocalFavorites`] over persisted storage, composed by
//! [`FavoritesClient`] with fallback from the first to the second.

mod local;
mod remote;
mod service;

use crate::domain::Character;
use anyhow::Result;
use std::sync::Arc;

pub use local::LocalFavorites;
pub use remote::RemoteFavorites;
pub use service::FavoritesClient;

/// What a source knows after a successful mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Synced {
    /// The mutation was acknowledged; the caller patches its cached view.
    Confirmed,

    /// The source's complete list after the mutation.
    Snapshot(Vec<Character>),
}

/// One place favorites can be read from and written to.
#[async_trait::async_trait]
pub trait FavoritesSource: Send + Sync {
    // ---
    async fn list(&self) -> Result<Vec<Character>>;

    async fn add(&self, character: &Character) -> Result<Synced>;

    async fn remove(&self, url: &str) -> Result<Synced>;

    async fn clear(&self) -> Result<Synced>;
}

pub type FavoritesSourcePtr = Arc<dyn FavoritesSource>;
