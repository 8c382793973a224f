use crate::app_state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};

#[derive(serde::Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    users: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favorites: Option<usize>,
}

/// Responds with the health status of the server.
///
/// Reads the user and favorites-list counts, which also proves the storage
/// backend is reachable.
///
/// # Responses
/// - `200 OK` with `{ "status": "OK", "timestamp", "users", "favorites" }`
/// - `500 INTERNAL SERVER ERROR` with `{ "status": "error", "timestamp" }` if the
///   storage backend cannot be read.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    // ---
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let counts = async {
        let users = state.auth().user_count().await?;
        let favorites = state.favorites().count().await?;
        Ok::<_, crate::domain::AppError>((users, favorites))
    };

    match counts.await {
        Ok((users, favorites)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK",
                timestamp,
                users: Some(users),
                favorites: Some(favorites),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "error",
                    timestamp,
                    users: None,
                    favorites: None,
                }),
            )
        }
    }
}
