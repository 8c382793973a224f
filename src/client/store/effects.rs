use super::{Action, AuthAction, Dispatcher, FavoritesAction};
use crate::client::auth::AuthClient;
use crate::client::favorites::FavoritesClient;
use std::sync::Arc;

/// Side effects triggered by actions.
///
/// Each handled action runs in its own task. Nothing is cancelled: when two
/// loads overlap, whichever finishes last decides the list.
#[derive(Clone)]
pub struct Effects {
    // ---
    favorites: Arc<FavoritesClient>,
    auth: Arc<AuthClient>,
}

impl Effects {
    // ---
    pub fn new(favorites: Arc<FavoritesClient>, auth: Arc<AuthClient>) -> Self {
        Self { favorites, auth }
    }

    pub(super) fn handle(&self, action: &Action, dispatcher: &Dispatcher) {
        // ---
        match action {
            Action::Favorites(action) => self.favorites_effect(action, dispatcher.clone()),
            Action::Auth(action) => self.auth_effect(action, dispatcher.clone()),
        }
    }

    fn favorites_effect(&self, action: &FavoritesAction, dispatcher: Dispatcher) {
        // ---
        let client = self.favorites.clone();

        match action.clone() {
            FavoritesAction::Load => {
                tokio::spawn(async move {
                    let result = match client.get_favorites().await {
                        Ok(favorites) => FavoritesAction::LoadSuccess { favorites },
                        Err(e) => FavoritesAction::LoadFailure {
                            error: failure_message(&e, "Failed to load favorites"),
                        },
                    };
                    dispatcher.dispatch(result);
                });
            }
            FavoritesAction::Add { character } => {
                tokio::spawn(async move {
                    let result = match client.add_favorite(&character).await {
                        Ok(()) => FavoritesAction::AddSuccess { character },
                        Err(e) => FavoritesAction::AddFailure {
                            error: failure_message(&e, "Failed to add to favorites"),
                        },
                    };
                    dispatcher.dispatch(result);
                });
            }
            FavoritesAction::Remove { url } => {
                tokio::spawn(async move {
                    let result = match client.remove_favorite(&url).await {
                        Ok(()) => FavoritesAction::RemoveSuccess { url },
                        Err(e) => FavoritesAction::RemoveFailure {
                            error: failure_message(&e, "Failed to remove from favorites"),
                        },
                    };
                    dispatcher.dispatch(result);
                });
            }
            _ => {}
        }
    }

    fn auth_effect(&self, action: &AuthAction, dispatcher: Dispatcher) {
        // ---
        let auth = self.auth.clone();
        let favorites = self.favorites.clone();

        match action.clone() {
            AuthAction::Login { request } => {
                tokio::spawn(async move {
                    match auth.login(&request).await {
                        Ok(session) => {
                            favorites.set_use_backend(true).await;
                            dispatcher.dispatch(AuthAction::LoginSuccess { session });
                            dispatcher.dispatch(FavoritesAction::Load);
                        }
                        Err(e) => dispatcher.dispatch(AuthAction::LoginFailure {
                            error: failure_message(&e, "Login failed"),
                        }),
                    }
                });
            }
            AuthAction::Register { request } => {
                tokio::spawn(async move {
                    match auth.register(&request).await {
                        Ok(session) => {
                            favorites.set_use_backend(true).await;
                            dispatcher.dispatch(AuthAction::RegisterSuccess { session });
                            dispatcher.dispatch(FavoritesAction::Load);
                        }
                        Err(e) => dispatcher.dispatch(AuthAction::RegisterFailure {
                            error: failure_message(&e, "Registration failed"),
                        }),
                    }
                });
            }
            AuthAction::Logout => {
                tokio::spawn(async move {
                    if let Err(e) = auth.logout().await {
                        tracing::error!("Error clearing stored session: {:#}", e);
                    }
                    favorites.set_use_backend(false).await;
                    dispatcher.dispatch(AuthAction::LogoutSuccess);
                    dispatcher.dispatch(FavoritesAction::Clear);
                });
            }
            AuthAction::CheckAuthStatus => {
                tokio::spawn(async move {
                    match auth.current_user().await {
                        Ok(user) => {
                            favorites.set_use_backend(true).await;
                            dispatcher.dispatch(AuthAction::CheckAuthStatusSuccess { user });
                            dispatcher.dispatch(FavoritesAction::Load);
                        }
                        Err(e) => {
                            tracing::debug!("No session restored: {:#}", e);
                            dispatcher.dispatch(AuthAction::CheckAuthStatusFailure);
                        }
                    }
                });
            }
            _ => {}
        }
    }
}

fn failure_message(err: &anyhow::Error, fallback: &str) -> String {
    // ---
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
