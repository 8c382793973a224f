use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A registered account, as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    // ---
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    // ---
    pub fn new(email: String, first_name: String, last_name: String) -> Self {
        // ---
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            created_at: Utc::now(),
        }
    }
}

/// A user record together with its credential.
///
/// Only the auth service sees this type. Handlers receive the inner [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    // ---
    pub user: User,

    /// bcrypt hash of the password
    pub password_hash: String,
}

/// A character record from the public reference API.
///
/// `url` is the identity used for favoriting. Every other field is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    // ---
    #[serde(default)]
    pub url: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Character {
    // ---
    /// Builds a character with only a url and a name, mostly for tests and demos.
    pub fn named(url: impl Into<String>, name: impl Into<String>) -> Self {
        // ---
        let mut fields = Map::new();
        fields.insert("name".to_string(), Value::String(name.into()));
        Self {
            url: url.into(),
            fields,
        }
    }

    /// The `name` field if present.
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}

/// Registration payload.
///
/// Fields are optional so that missing values surface as validation errors
/// rather than JSON rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    // ---
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    // ---
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A freshly issued session returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    // ---
    pub user: User,
    pub token: String,

    /// Token lifetime in milliseconds.
    pub expires_in: u64,
}
