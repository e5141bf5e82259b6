//! Anything that can be authorized.

use uuid::Uuid;

use blog_entity::user::UserRole;

/// A verified identity: a subject id plus a role.
pub trait Principal {
    /// The acting user's id.
    fn subject(&self) -> Uuid;

    /// The acting user's role.
    fn role(&self) -> UserRole;
}
