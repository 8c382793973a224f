// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod auth;
mod favorites;
mod health;
mod metrics;
mod root;
mod shared_types;

// Core handlers
pub use health::health_check;
pub use metrics::{metrics_handler, track_requests};
pub use root::{not_found_handler, root_handler};

// Auth handlers
pub use auth::{login, me, register};

// Favorites handlers
pub use favorites::{add_favorite, clear_favorites, list_favorites, remove_favorite};

pub use shared_types::{ApiJson, Authenticated, MessageResponse};
