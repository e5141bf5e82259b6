//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_entity::user::{User, UserRole};

/// Token type reported to clients.
pub const TOKEN_TYPE: &str = "bearer";

/// Login, registration and refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token. On refresh this is the token that was presented.
    pub refresh_token: String,
    /// Always `bearer`.
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// The authenticated user.
    pub user: UserResponse,
}

impl TokenResponse {
    /// Builds a response for `user`.
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        user: &User,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in,
            user: UserResponse::from(user),
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Full name, or the username when both names are blank.
    pub display_name: String,
    /// Profile picture URL.
    pub picture: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Role.
    pub role: UserRole,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Created at.
    pub created_at: DateTime<Utc>,
    /// Updated at.
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name(),
            picture: user.picture.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Storage backend in use.
    pub database: String,
    /// Whether the storage backend answered.
    pub database_healthy: bool,
}
