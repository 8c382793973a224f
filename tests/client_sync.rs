use anyhow::Result;
use character_favorites::client::auth::AuthClient;
use character_favorites::client::favorites::{FavoritesClient, LocalFavorites, RemoteFavorites};
use character_favorites::client::storage::{LocalStorage, LocalStoragePtr, MemoryStorage};
use character_favorites::client::store::favorites::{select_count, select_is_favorite};
use character_favorites::client::store::{AuthAction, Effects, FavoritesAction, Store};
use character_favorites::client::ApiError;
use character_favorites::domain::{Character, LoginRequest, RegisterRequest};
use reqwest::Client;
use std::sync::Arc;

mod common;

use common::TestServer;

struct Clients {
    storage: LocalStoragePtr,
    favorites: Arc<FavoritesClient>,
    auth: Arc<AuthClient>,
}

async fn clients(api_root: &str) -> Result<Clients> {
    // ---
    let http = Client::new();
    let storage: LocalStoragePtr = Arc::new(MemoryStorage::new());

    let remote = Arc::new(RemoteFavorites::new(http.clone(), api_root, storage.clone())?);
    let local = Arc::new(LocalFavorites::new(storage.clone()));

    Ok(Clients {
        favorites: Arc::new(FavoritesClient::new(remote, local).await),
        auth: Arc::new(AuthClient::new(http, api_root, storage.clone())?),
        storage,
    })
}

fn registration(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: Some(email.to_string()),
        password: Some("secret123".to_string()),
        first_name: Some("Sansa".to_string()),
        last_name: Some("Stark".to_string()),
    }
}

#[tokio::test]
async fn logged_in_client_writes_through_to_server() -> Result<()> {
    // ---
    let server = TestServer::new().await;
    let c = clients(&server.api_root()).await?;

    let session = c.auth.register(&registration("sansa@example.com")).await?;
    c.favorites.set_use_backend(true).await;

    let url = "https://anapioficeandfire.com/api/characters/957";
    c.favorites.add_favorite(&Character::named(url, "Sansa")).await?;
    assert!(c.favorites.contains(url));

    // The server has it, not just the cache
    let stored: Vec<Character> = server
        .client
        .get(server.url("/api/favorites"))
        .bearer_auth(&session.token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].url, url);

    c.favorites.remove_favorite(url).await?;
    assert!(c.favorites.get_favorites().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_server_falls_back_to_local_cache() -> Result<()> {
    // ---
    // Nothing listens on the discard port.
    let c = clients("http://127.0.0.1:9/api").await?;
    c.favorites.set_use_backend(true).await;

    c.favorites
        .add_favorite(&Character::named("char/1", "Jon"))
        .await?;

    assert!(c.favorites.contains("char/1"));
    let cached = c.storage.get_item("got-favorites").await?.unwrap_or_default();
    assert!(cached.contains("char/1"));
    Ok(())
}

#[tokio::test]
async fn auth_errors_carry_server_message() -> Result<()> {
    // ---
    let server = TestServer::new().await;
    let c = clients(&server.api_root()).await?;

    let err = c
        .auth
        .login(&LoginRequest {
            email: Some("ghost@example.com".to_string()),
            password: Some("secret123".to_string()),
        })
        .await
        .unwrap_err();

    let api = err.downcast_ref::<ApiError>().expect("an API error");
    assert_eq!(api.status, 401);
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!c.auth.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn store_login_loads_account_favorites() -> Result<()> {
    // ---
    let server = TestServer::new().await;
    let token = server.register("bran@example.com").await;
    server
        .client
        .post(server.url("/api/favorites"))
        .bearer_auth(&token)
        .json(&common::character("char/7", "Hodor"))
        .send()
        .await?;

    let c = clients(&server.api_root()).await?;
    let store = Store::spawn(Effects::new(c.favorites.clone(), c.auth.clone()));

    store.dispatch(AuthAction::Login {
        request: LoginRequest {
            email: Some("bran@example.com".to_string()),
            password: Some("secret123".to_string()),
        },
    });
    let state = store
        .wait_for(|s| s.auth.is_authenticated && select_count(s) == 1)
        .await;
    assert!(select_is_favorite("char/7")(&state));
    assert!(c.favorites.uses_backend());

    // Logging out drops back to the (empty) guest cache
    store.dispatch(AuthAction::Logout);
    let state = store
        .wait_for(|s| !s.auth.is_authenticated && select_count(s) == 0)
        .await;
    assert_eq!(state.favorites.error, None);
    assert!(!c.favorites.uses_backend());
    assert!(c.auth.token().await?.is_none());

    // Guest favorites stay local
    store.dispatch(FavoritesAction::Add {
        character: Character::named("char/8", "Summer"),
    });
    store.wait_for(select_is_favorite("char/8")).await;
    Ok(())
}
