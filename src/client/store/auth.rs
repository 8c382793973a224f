//! Auth slice.

use super::RootState;
use crate::domain::{AuthResponse, LoginRequest, RegisterRequest, User};

#[derive(Debug, Clone)]
pub enum AuthAction {
    // ---
    Login { request: LoginRequest },
    LoginSuccess { session: AuthResponse },
    LoginFailure { error: String },

    Register { request: RegisterRequest },
    RegisterSuccess { session: AuthResponse },
    RegisterFailure { error: String },

    Logout,
    LogoutSuccess,

    /// Restores a persisted session, if any.
    CheckAuthStatus,
    CheckAuthStatusSuccess { user: User },
    CheckAuthStatusFailure,

    ClearAuthError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    // ---
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub fn reduce(state: &mut AuthState, action: &AuthAction) {
    // ---
    use AuthAction::*;

    match action {
        Login { .. } | Register { .. } => {
            state.is_loading = true;
            state.error = None;
        }
        LoginSuccess { session } | RegisterSuccess { session } => {
            *state = AuthState {
                user: Some(session.user.clone()),
                token: Some(session.token.clone()),
                is_authenticated: true,
                ..AuthState::default()
            };
        }
        LoginFailure { error } | RegisterFailure { error } => {
            state.is_loading = false;
            state.error = Some(error.clone());
        }
        Logout | LogoutSuccess => *state = AuthState::default(),
        CheckAuthStatus => state.is_loading = true,
        CheckAuthStatusSuccess { user } => {
            state.user = Some(user.clone());
            state.is_authenticated = true;
            state.is_loading = false;
        }
        CheckAuthStatusFailure => {
            state.is_authenticated = false;
            state.is_loading = false;
        }
        ClearAuthError => state.error = None,
    }
}

// --- selectors

pub fn select_user(state: &RootState) -> Option<&User> {
    state.auth.user.as_ref()
}

pub fn select_is_authenticated(state: &RootState) -> bool {
    state.auth.is_authenticated
}

pub fn select_auth_loading(state: &RootState) -> bool {
    state.auth.is_loading
}

pub fn select_auth_error(state: &RootState) -> Option<&str> {
    state.auth.error.as_deref()
}
