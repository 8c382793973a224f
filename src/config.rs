// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: server::ServerConfig,
    pub auth: auth::AuthConfig,
    pub storage: storage::StorageConfig,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            server: server::ServerConfig::from_env()?,
            auth: auth::AuthConfig::from_env()?,
            storage: storage::StorageConfig::from_env()?,
        })
    }
}

// ============================================================
// Server configuration
// ============================================================

mod server {
    // ---
    use super::*;

    /// Which metrics backend to install.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MetricsType {
        Noop,
        Prometheus,
    }

    /// HTTP listener and observability settings.
    #[derive(Debug, Clone)]
    pub struct ServerConfig {
        /// Listener address. Defaults to `127.0.0.1:3000`.
        pub bind_addr: String,

        /// `prom` selects Prometheus, anything else the no-op recorder.
        pub metrics: MetricsType,
    }

    impl ServerConfig {
        /// Builds a [`ServerConfig`] from environment variables.
        ///
        /// Every value has a default, so this never fails today.
        pub fn from_env() -> Result<Self> {
            // ---
            let bind_addr =
                std::env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

            let metrics = match std::env::var("AXUM_METRICS_TYPE").as_deref() {
                Ok("prom") => MetricsType::Prometheus,
                _ => MetricsType::Noop,
            };

            Ok(Self { bind_addr, metrics })
        }
    }
}
pub use server::{MetricsType, ServerConfig};

// ============================================================
// Auth configuration
// ============================================================

mod auth {
    // ---
    use super::*;

    /// Session signing and password hashing settings.
    #[derive(Clone)]
    pub struct AuthConfig {
        /// HMAC secret for session tokens. Required.
        pub jwt_secret: String,

        /// Session token lifetime. Defaults to 7 days.
        pub token_ttl: Duration,

        /// bcrypt work factor. Defaults to 10.
        pub bcrypt_cost: u32,

        /// Register the demo account at startup. Defaults to true.
        pub seed_demo_user: bool,
    }

    // The secret stays out of logs.
    impl std::fmt::Debug for AuthConfig {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("AuthConfig")
                .field("jwt_secret", &"<redacted>")
                .field("token_ttl", &self.token_ttl)
                .field("bcrypt_cost", &self.bcrypt_cost)
                .field("seed_demo_user", &self.seed_demo_user)
                .finish()
        }
    }

    impl AuthConfig {
        /// Builds an [`AuthConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if the signing secret is missing, or if the token
        /// lifetime is zero or longer than ten years. The secret is
        /// security-critical and must be explicitly provided.
        pub fn from_env() -> Result<Self> {
            // ---
            let jwt_secret = required_env!("AXUM_JWT_SECRET");
            let ttl_secs = optional_env_parse!(
                "AXUM_TOKEN_TTL_SEC",
                u64,
                crate::session::SESSION_TTL_SECONDS
            );
            anyhow::ensure!(
                (1..=crate::session::MAX_SESSION_TTL_SECONDS).contains(&ttl_secs),
                "AXUM_TOKEN_TTL_SEC must be between 1 and {}",
                crate::session::MAX_SESSION_TTL_SECONDS
            );
            let bcrypt_cost = optional_env_parse!("AXUM_BCRYPT_COST", u32, 10);
            let seed_demo_user = optional_env_parse!("AXUM_SEED_DEMO_USER", bool, true);

            Ok(Self {
                jwt_secret,
                token_ttl: Duration::from_secs(ttl_secs),
                bcrypt_cost,
                seed_demo_user,
            })
        }
    }
}
pub use auth::AuthConfig;

// ============================================================
// Storage configuration
// ============================================================

mod storage {
    // ---
    use super::*;

    /// Where users and favorites are kept.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StorageConfig {
        /// Process memory. Everything is lost on restart.
        Memory,

        /// A Redis server at the given connection string.
        Redis { url: String },
    }

    impl StorageConfig {
        /// Builds a [`StorageConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error for an unknown backend name, or when the redis
        /// backend is selected without `AXUM_REDIS_URL`.
        pub fn from_env() -> Result<Self> {
            // ---
            let backend =
                std::env::var("AXUM_STORAGE_BACKEND").unwrap_or_else(|_| "memory".to_string());

            match backend.as_str() {
                "memory" => Ok(Self::Memory),
                "redis" => {
                    let url = required_env!("AXUM_REDIS_URL");
                    Ok(Self::Redis { url })
                }
                other => anyhow::bail!("Unknown AXUM_STORAGE_BACKEND: {other}"),
            }
        }
    }
}
pub use storage::StorageConfig;

// ============================================================
// Tests
// ============================================================
