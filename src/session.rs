//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the user id and an expiry. The server keeps
//! no session table: a token is valid while its signature checks out and its
//! expiry has not passed.

use crate::domain::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

// ---

/// Default session token time-to-live in seconds (7 days).
pub const SESSION_TTL_SECONDS: u64 = 604_800;

/// Longest accepted session lifetime in seconds (10 years).
pub const MAX_SESSION_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

// ---

/// Claims embedded in every issued token.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Claims {
    //
    user_id: String,
    iat: i64,
    exp: i64,
}

/// Identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    //
    pub user_id: Uuid,
    pub expires_at: i64,
}

/// Signing material and lifetime for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    //
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    // ---
    pub fn new(secret: &str, ttl: Duration) -> Self {
        //
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// ---

/// Creates a signed session token for `user_id`.
///
/// # Returns
/// The encoded token, or an internal error if signing fails.
pub fn create_session(keys: &SessionKeys, user_id: Uuid) -> Result<String, AppError> {
    //
    let now = chrono::Utc::now().timestamp();
    let exp = i64::try_from(keys.ttl.as_secs())
        .ok()
        .and_then(|ttl| now.checked_add(ttl))
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("session ttl {:?} is out of range", keys.ttl))
        })?;

    issue(keys, user_id, now, exp)
}

fn issue(keys: &SessionKeys, user_id: Uuid, iat: i64, exp: i64) -> Result<String, AppError> {
    //
    let claims = Claims {
        user_id: user_id.to_string(),
        iat,
        exp,
    };

    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(|e| {
        //
        tracing::error!("Failed to sign session token: {}", e);
        AppError::Internal(e.into())
    })
}

/// Verifies a session token and returns the embedded identity.
///
/// Fails with [`AppError::InvalidToken`] on a bad signature, a malformed
/// token, or an expired one.
pub fn validate_session(keys: &SessionKeys, token: &str) -> Result<SessionInfo, AppError> {
    //
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
        //
        tracing::debug!("Rejected session token: {}", e);
        AppError::InvalidToken
    })?;

    let user_id = Uuid::parse_str(&data.claims.user_id).map_err(|_| AppError::InvalidToken)?;

    Ok(SessionInfo {
        user_id,
        expires_at: data.claims.exp,
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret", Duration::from_secs(SESSION_TTL_SECONDS))
    }

    #[test]
    fn issued_token_verifies() {
        // ---
        let keys = keys();
        let user_id = Uuid::new_v4();

        let token = create_session(&keys, user_id).unwrap();
        let info = validate_session(&keys, &token).unwrap();

        assert_eq!(info.user_id, user_id);
        let expected = chrono::Utc::now().timestamp() + SESSION_TTL_SECONDS as i64;
        assert!((info.expires_at - expected).abs() <= 2);
    }

    #[test]
    fn expired_token_is_rejected() {
        // ---
        let keys = keys();
        let now = chrono::Utc::now().timestamp();
        let token = issue(&keys, Uuid::new_v4(), now - 100, now - 10).unwrap();

        assert!(matches!(
            validate_session(&keys, &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        // ---
        let other = SessionKeys::new("someone-else", Duration::from_secs(60));
        let token = create_session(&other, Uuid::new_v4()).unwrap();

        assert!(matches!(
            validate_session(&keys(), &token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn oversized_ttl_fails_instead_of_wrapping() {
        // ---
        let keys = SessionKeys::new("test-secret", Duration::from_secs(u64::MAX));

        assert!(matches!(
            create_session(&keys, Uuid::new_v4()),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        // ---
        assert!(validate_session(&keys(), "not.a.jwt").is_err());
        assert!(validate_session(&keys(), "").is_err());
    }
}
