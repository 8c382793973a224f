//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` holds the metrics
//! implementation and the two domain services, all cheap to clone.

use crate::domain::{AuthService, FavoritesStore, MetricsPtr};

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the application.
///
/// # Design Principles
///
/// - **Dependency Inversion**: Services depend on the `Repository` trait,
///   not on the memory or Redis backends behind it.
/// - **Immutable After Initialization**: State is built once at startup and
///   never replaced. Mutation happens inside the repositories.
/// - **Cheap Cloning**: Every field is an `Arc` or wraps `Arc`s.
///
/// # Lifecycle
///
/// 1. Created once in `create_app()` during application startup
/// 2. Attached to the Axum router via `.with_state(app_state)`
/// 3. Cloned automatically by Axum for each incoming HTTP request
/// 4. Handlers extract via `State(state): State<AppState>`
#[derive(Clone)]
pub(crate) struct AppState {
    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,

    /// Registration, login, and token verification.
    auth: AuthService,

    /// Per-user favorites lists.
    favorites: FavoritesStore,
}

impl AppState {
    // ---

    pub fn new(metrics: MetricsPtr, auth: AuthService, favorites: FavoritesStore) -> Self {
        // ---
        AppState {
            metrics,
            auth,
            favorites,
        }
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the auth service.
    pub(crate) fn auth(&self) -> &AuthService {
        // ---
        &self.auth
    }

    /// Get a reference to the favorites store.
    pub(crate) fn favorites(&self) -> &FavoritesStore {
        // ---
        &self.favorites
    }
}
