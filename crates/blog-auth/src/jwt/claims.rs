//! JWT claims structure shared by access and refresh tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blog_entity::user::UserRole;

use crate::rbac::Principal;

/// Claims payload embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Username at issue time.
    pub username: String,
    /// Role at issue time.
    pub role: UserRole,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Unique token ID.
    pub jti: Uuid,
    /// `access` or `refresh`.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on API requests.
    Access,
    /// Long-lived token used only to mint access tokens.
    Refresh,
}

impl Claims {
    /// The user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

impl Principal for Claims {
    fn subject(&self) -> Uuid {
        self.sub
    }

    fn role(&self) -> UserRole {
        self.role
    }
}
