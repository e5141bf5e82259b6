//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A blog post owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Unique post identifier.
    pub id: Uuid,
    /// Author.
    pub user_id: Uuid,
    /// Short slug-like name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Inactive posts are hidden from the public listing.
    pub is_active: bool,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// When the post was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether the given user authored this post.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Data required to create a new post.
#[derive(Debug, Clone)]
pub struct CreatePost {
    /// Author.
    pub user_id: Uuid,
    /// Short name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Initial visibility.
    pub is_active: bool,
}

/// Partial post update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    /// New name.
    pub name: Option<String>,
    /// New title.
    pub title: Option<String>,
    /// New body text.
    pub text: Option<String>,
    /// New visibility.
    pub is_active: Option<bool>,
}
