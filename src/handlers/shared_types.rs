use crate::app_state::AppState;
use crate::domain::AppError;
use crate::session::SessionInfo;
use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Body for every non-2xx response, and for bare acknowledgements.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // ---
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(err) => {
                tracing::error!("Unhandled error: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

/// Malformed, mistyped or wrongly labelled bodies are plain bad input.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // ---
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        AppError::validation("Invalid request body")
    }
}

/// `Json` extractor whose rejections use the `{message}` error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Identity of the caller, resolved from `Authorization: Bearer <token>`.
///
/// Rejects with 401 when no token is present and 403 when the token does not
/// verify. The user record itself is not looked up.
#[derive(Debug, Clone)]
pub struct Authenticated(pub SessionInfo);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        // ---
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(' ').nth(1))
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                tracing::debug!("Missing bearer token");
                AppError::unauthorized("Access token required")
            })?;

        state.auth().verify(token).map(Authenticated)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::{create_app, AppConfig, AuthConfig, MetricsType, ServerConfig, StorageConfig};
    use axum::{body::Body, http::Request, Router};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn router() -> Router {
        // ---
        let config = AppConfig {
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".to_string(),
                metrics: MetricsType::Noop,
            },
            auth: AuthConfig {
                jwt_secret: "unit-secret".to_string(),
                token_ttl: Duration::from_secs(60),
                bcrypt_cost: 4,
                seed_demo_user: false,
            },
            storage: StorageConfig::Memory,
        };
        create_app(config).await.unwrap()
    }

    async fn get_favorites(authorization: Option<&str>) -> (StatusCode, String) {
        // ---
        let mut request = Request::builder().uri("/api/favorites");
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = router()
            .await
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: MessageResponse = serde_json::from_slice(&bytes).unwrap();
        (status, body.message)
    }

    #[tokio::test]
    async fn missing_or_empty_token_is_401() {
        // ---
        for header in [None, Some("Bearer"), Some("Bearer ")] {
            let (status, message) = get_favorites(header).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "for {header:?}");
            assert_eq!(message, "Access token required");
        }
    }

    #[tokio::test]
    async fn unverifiable_token_is_403() {
        // ---
        let (status, message) = get_favorites(Some("Bearer abc.def.ghi")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(message, "Invalid or expired token");
    }

    #[test]
    fn internal_errors_hide_detail() {
        // ---
        let response =
            AppError::Internal(anyhow::anyhow!("redis exploded at 10.0.0.3")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_statuses() {
        // ---
        let cases = [
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (AppError::InvalidToken, StatusCode::FORBIDDEN),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
