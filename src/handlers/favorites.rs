use crate::app_state::AppState;
use crate::domain::{AppError, Character};
use crate::handlers::{Authenticated, MessageResponse};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

/// Handler for listing the caller's favorites (GET /api/favorites).
///
/// Responds with `200 OK` and the favorites in insertion order. A user with
/// no list gets an empty array.
#[tracing::instrument(skip(state, identity))]
pub async fn list_favorites(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<Vec<Character>>, AppError> {
    // ---
    let favorites = state.favorites().list(identity.user_id).await?;
    Ok(Json(favorites))
}

/// Handler for adding a favorite (POST /api/favorites).
///
/// Expects a character object with a non-empty `url`.
///
/// - Responds with `400 Bad Request` if the body is not a JSON character or has no url.
/// - Responds with `409 Conflict` if the url is already a favorite.
/// - On success, responds with `201 Created`.
#[tracing::instrument(skip(state, identity, body))]
pub async fn add_favorite(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    // ---
    let character: Character = body
        .map_err(|e| e.body_text())
        .and_then(|Json(value)| serde_json::from_value(value).map_err(|e| e.to_string()))
        .map_err(|reason| {
            tracing::debug!("Rejected character payload: {}", reason);
            AppError::validation("Invalid character data")
        })?;

    tracing::info!("{} favorites {}", identity.user_id, &character.url);
    state.favorites().add(identity.user_id, character).await?;
    state.metrics().record_favorite_added();

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Character added to favorites")),
    ))
}

/// Handler for removing one favorite (DELETE /api/favorites/{characterUrl}).
///
/// The url arrives percent-encoded as a single path segment. Removing a url
/// that is not a favorite still responds with `200 OK`.
#[tracing::instrument(skip(state, identity))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(character_url): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    // ---
    let removed = state
        .favorites()
        .remove(identity.user_id, &character_url)
        .await?;
    tracing::debug!("Removal of {} matched: {}", character_url, removed);

    Ok(Json(MessageResponse::new("Character removed from favorites")))
}

/// Handler for clearing all favorites (DELETE /api/favorites).
#[tracing::instrument(skip(state, identity))]
pub async fn clear_favorites(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<MessageResponse>, AppError> {
    // ---
    state.favorites().clear(identity.user_id).await?;
    Ok(Json(MessageResponse::new("All favorites cleared")))
}
