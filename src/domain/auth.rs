//! Email/password authentication.
//!
//! Users live in one repository keyed by id; a second repository maps email
//! to id and doubles as the uniqueness lock for registration. Passwords are
//! bcrypt-hashed on the blocking pool and never logged.

use super::error::{AppError, AppResult};
use super::favorites::FavoritesStore;
use super::models::{AuthResponse, LoginRequest, RegisterRequest, StoredUser, User};
use super::repository::RepositoryPtr;
use crate::session::{create_session, validate_session, SessionInfo, SessionKeys};
use anyhow::Context;
use std::sync::Arc;
use uuid::Uuid;

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    // ---
    users: RepositoryPtr<StoredUser>,
    emails: RepositoryPtr<Uuid>,
    favorites: FavoritesStore,
    keys: Arc<SessionKeys>,
    hash_cost: u32,
}

impl AuthService {
    // ---
    pub fn new(
        users: RepositoryPtr<StoredUser>,
        emails: RepositoryPtr<Uuid>,
        favorites: FavoritesStore,
        keys: SessionKeys,
        hash_cost: u32,
    ) -> Self {
        // ---
        Self {
            users,
            emails,
            favorites,
            keys: Arc::new(keys),
            hash_cost,
        }
    }

    /// Creates an account, its empty favorites list, and a session.
    pub async fn register(&self, req: RegisterRequest) -> AppResult<AuthResponse> {
        // ---
        let (Some(email), Some(password), Some(first_name), Some(last_name)) = (
            present(req.email),
            present(req.password),
            present(req.first_name),
            present(req.last_name),
        ) else {
            return Err(AppError::validation("All fields are required"));
        };

        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        // Cheap pre-check so a duplicate does not pay for a bcrypt round.
        if self.emails.get(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists with this email"));
        }

        let password_hash = self.hash_password(password).await?;
        let user = User::new(email, first_name, last_name);

        if !self.emails.put_if_absent(&user.email, user.id).await? {
            return Err(AppError::conflict("User already exists with this email"));
        }

        if let Err(e) = self.store_new_user(&user, password_hash).await {
            // Release the email so the address can register again.
            if let Err(undo) = self.emails.delete(&user.email).await {
                tracing::error!("Failed to release email reservation: {:#}", undo);
            }
            return Err(e);
        }

        tracing::info!("Registered user {} ({})", user.email, user.id);

        self.session_for(user)
    }

    /// Checks credentials and issues a session.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    pub async fn login(&self, req: LoginRequest) -> AppResult<AuthResponse> {
        // ---
        let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
            return Err(AppError::validation("Email and password are required"));
        };

        let Some(stored) = self.find_by_email(&email).await? else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        let hash = stored.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .context("password verification task failed")?
            .context("password verification failed")?;

        if !matches {
            tracing::warn!("Login attempt with wrong password for {}", stored.user.id);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        self.session_for(stored.user)
    }

    /// Resolves a bearer token to an identity.
    ///
    /// Only the signature and expiry are checked; the user is not looked up.
    pub fn verify(&self, token: &str) -> AppResult<SessionInfo> {
        // ---
        validate_session(&self.keys, token)
    }

    pub async fn current_user(&self, user_id: Uuid) -> AppResult<User> {
        // ---
        self.users
            .get(&user_id.to_string())
            .await?
            .map(|stored| stored.user)
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn user_count(&self) -> AppResult<usize> {
        // ---
        Ok(self.users.count().await?)
    }

    /// Registers the demo account unless it already exists.
    pub async fn seed_demo_user(&self) -> AppResult<()> {
        // ---
        let req = RegisterRequest {
            email: Some("demo@got-explorer.com".to_string()),
            password: Some("demo123".to_string()),
            first_name: Some("Demo".to_string()),
            last_name: Some("User".to_string()),
        };

        match self.register(req).await {
            Ok(_) => {
                tracing::info!("Demo account: demo@got-explorer.com / demo123");
                Ok(())
            }
            Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn store_new_user(&self, user: &User, password_hash: String) -> AppResult<()> {
        // ---
        self.users
            .put(
                &user.id.to_string(),
                StoredUser {
                    user: user.clone(),
                    password_hash,
                },
            )
            .await?;
        self.favorites.init(user.id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<StoredUser>> {
        // ---
        let Some(user_id) = self.emails.get(email).await? else {
            return Ok(None);
        };
        Ok(self.users.get(&user_id.to_string()).await?)
    }

    async fn hash_password(&self, password: String) -> AppResult<String> {
        // ---
        let cost = self.hash_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("password hashing task failed")?
            .context("password hashing failed")?;
        Ok(hash)
    }

    fn session_for(&self, user: User) -> AppResult<AuthResponse> {
        // ---
        let token = create_session(&self.keys, user.id)?;
        let expires_in =
            u64::try_from(self.keys.ttl().as_millis()).context("session ttl is out of range")?;

        Ok(AuthResponse {
            user,
            token,
            expires_in,
        })
    }
}

/// Treats empty strings as missing, like the JSON clients expect.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
