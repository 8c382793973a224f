// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use domain::{AuthService, Character, FavoritesStore, RepositoryPtr, StoredUser};
use handlers::*;
use uuid::Uuid;

// Public exports (visible outside this module)
pub mod client;
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;
mod session;

// Hoist up only the public symbol(s)
pub use session::{
    create_session, validate_session, SessionInfo, SessionKeys, SESSION_TTL_SECONDS,
};

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_memory_repository, // ---
    create_noop_metrics,
    create_prom_metrics,
    create_redis_repository,
};

/// Build the HTTP router with configuration read from environment variables.
pub async fn create_router() -> Result<Router> {
    // ---
    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    let config = AppConfig::from_env()?;
    create_app(config).await
}

/// Build the HTTP router from an explicit configuration.
///
/// Seeds the demo account when the configuration asks for it.
pub async fn create_app(config: AppConfig) -> Result<Router> {
    // ---
    let metrics = match config.server.metrics {
        MetricsType::Prometheus => create_prom_metrics()?,
        MetricsType::Noop => create_noop_metrics()?,
    };

    let (users, emails, lists) = create_repositories(&config.storage)?;

    let favorites = FavoritesStore::new(lists);
    let auth = AuthService::new(
        users,
        emails,
        favorites.clone(),
        SessionKeys::new(&config.auth.jwt_secret, config.auth.token_ttl),
        config.auth.bcrypt_cost,
    );

    if config.auth.seed_demo_user {
        auth.seed_demo_user().await?;
    }

    let app_state = AppState::new(metrics, auth, favorites);

    let api = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route(
            "/favorites",
            get(list_favorites)
                .post(add_favorite)
                .delete(clear_favorites),
        )
        .route("/favorites/{characterUrl}", delete(remove_favorite));

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api", api)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_requests,
        ))
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    Ok(router)
}

/// Turns a handler panic into the same opaque 500 body as any internal error.
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    // ---
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    domain::AppError::Internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

type Repositories = (
    RepositoryPtr<StoredUser>,
    RepositoryPtr<Uuid>,
    RepositoryPtr<Vec<Character>>,
);

fn create_repositories(storage: &StorageConfig) -> Result<Repositories> {
    // ---
    match storage {
        StorageConfig::Memory => {
            tracing::info!("Using in-memory storage; data is lost on restart");
            Ok((
                create_memory_repository(),
                create_memory_repository(),
                create_memory_repository(),
            ))
        }
        StorageConfig::Redis { url } => {
            tracing::info!("Using Redis storage");
            let client = redis::Client::open(url.as_str())?;
            Ok((
                create_redis_repository(client.clone(), "user"),
                create_redis_repository(client.clone(), "email"),
                create_redis_repository(client, "favorites"),
            ))
        }
    }
}
