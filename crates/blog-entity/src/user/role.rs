//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Privilege tiers, totally ordered by [`UserRole::rank`]:
/// `User < Staff < Superuser`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular account: owns its posts, comments and likes.
    #[default]
    User,
    /// Moderator: may act on any user's content.
    Staff,
    /// Full administrator: may also change roles.
    Superuser,
}

impl UserRole {
    /// All roles in ascending rank order.
    pub const ALL: [UserRole; 3] = [Self::User, Self::Staff, Self::Superuser];

    /// Position in the privilege order (higher = more privileged).
    pub fn rank(&self) -> u8 {
        match self {
            Self::User => 0,
            Self::Staff => 1,
            Self::Superuser => 2,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, minimum: UserRole) -> bool {
        self.rank() >= minimum.rank()
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Staff => "staff",
            Self::Superuser => "superuser",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = blog_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "staff" => Ok(Self::Staff),
            "superuser" => Ok(Self::Superuser),
            _ => Err(blog_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: user, staff, superuser"
            ))),
        }
    }
}
