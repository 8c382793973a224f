//! Authentication handlers.
//!
//! 1. `register` - create an account and return a session
//! 2. `login` - exchange credentials for a session
//! 3. `me` - return the account behind a bearer token

use crate::app_state::AppState;
use crate::domain::{AppError, AuthResponse, LoginRequest, RegisterRequest, User};
use crate::handlers::{ApiJson, Authenticated};
use axum::{extract::State, http::StatusCode, Json};

/// POST /api/auth/register
///
/// # Responses
/// - `201 Created` with `{user, token, expiresIn}`
/// - `400 Bad Request` if the body is not valid JSON, a field is missing, or
///   the password is too short
/// - `409 Conflict` if the email is already registered
#[tracing::instrument(skip(state, req))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    // ---
    let session = state.auth().register(req).await?;
    state.metrics().record_user_registered();

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/auth/login
///
/// # Responses
/// - `200 OK` with `{user, token, expiresIn}`
/// - `400 Bad Request` if the body is not valid JSON or email or password is missing
/// - `401 Unauthorized` with the same message for unknown email and wrong password
#[tracing::instrument(skip(state, req))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // ---
    let session = state.auth().login(req).await?;
    tracing::info!("User {} logged in", session.user.id);

    Ok(Json(session))
}

/// GET /api/auth/me
///
/// Unlike the favorites routes, this one checks that the user still exists.
#[tracing::instrument(skip(state, identity))]
pub async fn me(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<User>, AppError> {
    // ---
    let user = state.auth().current_user(identity.user_id).await?;
    Ok(Json(user))
}
