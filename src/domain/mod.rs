mod auth;
mod error;
mod favorites;
mod metrics;
mod models;
mod repository;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Publicly expose the storage capability and the services built on it
pub use auth::{AuthService, MIN_PASSWORD_LEN};
pub use error::{AppError, AppResult};
pub use favorites::FavoritesStore;
pub use repository::{Repository, RepositoryPtr};

pub use models::{AuthResponse, Character, LoginRequest, RegisterRequest, StoredUser, User};
