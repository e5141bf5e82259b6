//! Request context carrying the authenticated user.

use serde::Serialize;
use uuid::Uuid;

use blog_auth::Principal;
use blog_entity::user::{User, UserRole};

/// Who is acting on the current request.
///
/// Built from a verified access token and the stored user record, so the
/// role reflects the account as it is now, not as it was at issue time.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The user's current role.
    pub role: UserRole,
    /// The username.
    pub username: String,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, role: UserRole, username: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            username: username.into(),
        }
    }
}

impl From<&User> for RequestContext {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role, user.username.clone())
    }
}

impl Principal for RequestContext {
    fn subject(&self) -> Uuid {
        self.user_id
    }

    fn role(&self) -> UserRole {
        self.role
    }
}
