use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::handlers::MessageResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Character Favorites API 👋
Version: {version}

Available endpoints:
  - GET    /health                     - Health check with user/favorites counts
  - POST   /api/auth/register          - Create an account
  - POST   /api/auth/login             - Log in and receive a bearer token
  - GET    /api/auth/me                - Current user (bearer token)
  - GET    /api/favorites              - List favorites (bearer token)
  - POST   /api/favorites              - Add a favorite (bearer token)
  - DELETE /api/favorites/{{url}}        - Remove one favorite, url percent-encoded (bearer token)
  - DELETE /api/favorites              - Clear all favorites (bearer token)
  - GET    /metrics                    - Prometheus metrics
"#
    )
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(MessageResponse::new("Route not found")),
    )
}
