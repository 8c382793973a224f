//! Account session on the client side.
//!
//! The token and the user are persisted under [`TOKEN_KEY`] and [`USER_KEY`]
//! so that a restarted client resumes the session.

use crate::client::storage::{LocalStoragePtr, TOKEN_KEY, USER_KEY};
use crate::client::{endpoint, expect_success, parse_api_root};
use crate::domain::{AuthResponse, LoginRequest, RegisterRequest, User};
use anyhow::{anyhow, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use reqwest::{Client, Url};
use serde::Deserialize;

pub struct AuthClient {
    // ---
    http: Client,
    base_url: Url,
    storage: LocalStoragePtr,
}

#[derive(Deserialize)]
struct Expiry {
    exp: i64,
}

impl AuthClient {
    // ---
    pub fn new(http: Client, base_url: &str, storage: LocalStoragePtr) -> Result<Self> {
        // ---
        Ok(Self {
            http,
            base_url: parse_api_root(base_url)?,
            storage,
        })
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        // ---
        self.authenticate("register", request).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        // ---
        self.authenticate("login", request).await
    }

    /// Forgets the session. Tokens are stateless, so the service is not told.
    pub async fn logout(&self) -> Result<()> {
        // ---
        self.storage.remove_item(TOKEN_KEY).await?;
        self.storage.remove_item(USER_KEY).await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// The signed-in user.
    ///
    /// Answers from storage when both token and user are there, asks the
    /// service when only the token is. A token the service rejects ends the
    /// session.
    pub async fn current_user(&self) -> Result<User> {
        // ---
        let Some(token) = self.token().await? else {
            return Err(anyhow!("No authentication token found"));
        };

        if let Some(user) = self.stored_user().await {
            return Ok(user);
        }

        let fetched = async {
            let response = self
                .http
                .get(endpoint(&self.base_url, &["auth", "me"]))
                .bearer_auth(&token)
                .send()
                .await?;
            let user: User = expect_success(response).await?.json().await?;
            Ok::<_, anyhow::Error>(user)
        }
        .await;

        match fetched {
            Ok(user) => {
                self.storage
                    .set_item(USER_KEY, &serde_json::to_string(&user)?)
                    .await?;
                Ok(user)
            }
            Err(e) => {
                tracing::error!("Error fetching current user: {:#}", e);
                self.logout().await?;
                Err(e)
            }
        }
    }

    pub async fn token(&self) -> Result<Option<String>> {
        self.storage.get_item(TOKEN_KEY).await
    }

    /// True when a session was persisted, whether or not it is still valid.
    pub async fn is_authenticated(&self) -> bool {
        // ---
        matches!(self.token().await, Ok(Some(_))) && self.stored_user().await.is_some()
    }

    /// Reads the expiry from the stored token without checking its signature.
    ///
    /// Missing or unreadable tokens count as expired.
    pub async fn is_token_expired(&self) -> bool {
        // ---
        let Ok(Some(token)) = self.token().await else {
            return true;
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        match decode::<Expiry>(&token, &DecodingKey::from_secret(b""), &validation) {
            Ok(data) => data.claims.exp < chrono::Utc::now().timestamp(),
            Err(e) => {
                tracing::debug!("Unreadable stored token: {}", e);
                true
            }
        }
    }

    async fn authenticate<B: serde::Serialize>(
        &self,
        action: &str,
        body: &B,
    ) -> Result<AuthResponse> {
        // ---
        let response = self
            .http
            .post(endpoint(&self.base_url, &["auth", action]))
            .json(body)
            .send()
            .await?;

        let session: AuthResponse = match expect_success(response).await {
            Ok(response) => response.json().await?,
            Err(e) => {
                tracing::warn!("Auth {} failed: {:#}", action, e);
                return Err(e);
            }
        };

        self.storage.set_item(TOKEN_KEY, &session.token).await?;
        self.storage
            .set_item(USER_KEY, &serde_json::to_string(&session.user)?)
            .await?;

        tracing::info!("Signed in as {}", session.user.id);
        Ok(session)
    }

    async fn stored_user(&self) -> Option<User> {
        // ---
        let raw = self.storage.get_item(USER_KEY).await.ok()??;
        serde_json::from_str(&raw)
            .map_err(|e| tracing::error!("Error reading stored user: {}", e))
            .ok()
    }
}
