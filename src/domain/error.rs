//! Domain error taxonomy.
//!
//! Every failure the service can report falls into one of these categories.
//! Validation and conflict errors are raised before any mutation happens.
//! The HTTP mapping lives in `handlers::shared_types`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or a missing token.
    #[error("{0}")]
    Unauthorized(String),

    /// A token was presented but its signature or expiry is invalid.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Duplicate email or duplicate favorite.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected. The inner error is logged, never returned.
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    // ---
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// Result alias used by domain services.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn internal_error_hides_detail() {
        // ---
        let err = AppError::from(anyhow::anyhow!("redis exploded at 10.0.0.4"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn messages_pass_through() {
        // ---
        assert_eq!(
            AppError::conflict("User already exists with this email").to_string(),
            "User already exists with this email"
        );
        assert_eq!(
            AppError::InvalidToken.to_string(),
            "Invalid or expired token"
        );
    }
}
