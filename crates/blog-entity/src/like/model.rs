//! Like entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user's reaction to a post. At most one per `(user_id, post_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Like {
    /// Unique reaction identifier.
    pub id: Uuid,
    /// Reacting user.
    pub user_id: Uuid,
    /// Target post.
    pub post_id: Uuid,
    /// `true` for a like, `false` for a dislike.
    pub is_like: bool,
    /// When the reaction was created.
    pub created_at: DateTime<Utc>,
    /// When the reaction was last switched.
    pub updated_at: DateTime<Utc>,
}

/// Aggregated reaction counts for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStats {
    /// Number of likes.
    pub likes_count: i64,
    /// Number of dislikes.
    pub dislikes_count: i64,
    /// The viewer's own reaction, if any.
    pub user_liked: Option<bool>,
}

/// Result of toggling a reaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// The viewer's reaction after the toggle; `None` when it was removed.
    pub liked: Option<bool>,
    /// Number of likes after the toggle.
    pub likes_count: i64,
    /// Number of dislikes after the toggle.
    pub dislikes_count: i64,
}
