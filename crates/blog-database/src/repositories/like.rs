//! Like repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_entity::like::Like;

use super::{db_error, violated_constraint};

/// Persistence operations on post reactions.
///
/// At most one reaction exists per `(user_id, post_id)`.
#[async_trait]
pub trait LikeRepository: Send + Sync + std::fmt::Debug + 'static {
    /// The user's reaction to a post, if any.
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> AppResult<Option<Like>>;

    /// Record a new reaction. Fails with `Conflict` if one already exists.
    async fn create(&self, user_id: Uuid, post_id: Uuid, is_like: bool) -> AppResult<Like>;

    /// Switch an existing reaction between like and dislike.
    async fn set_reaction(&self, id: Uuid, is_like: bool) -> AppResult<Like>;

    /// Remove a reaction.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// `(likes, dislikes)` for a post.
    async fn counts(&self, post_id: Uuid) -> AppResult<(i64, i64)>;
}

/// PostgreSQL-backed [`LikeRepository`].
#[derive(Debug, Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    /// Create a new like repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    async fn find(&self, user_id: Uuid, post_id: Uuid) -> AppResult<Option<Like>> {
        sqlx::query_as::<_, Like>("SELECT * FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find reaction"))
    }

    async fn create(&self, user_id: Uuid, post_id: Uuid, is_like: bool) -> AppResult<Like> {
        let now = Utc::now();
        sqlx::query_as::<_, Like>(
            "INSERT INTO likes (id, user_id, post_id, is_like, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $5) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(post_id)
        .bind(is_like)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e) {
            Some("likes_user_post_key") => AppError::conflict("Reaction already recorded"),
            _ => db_error("Failed to create reaction")(e),
        })
    }

    async fn set_reaction(&self, id: Uuid, is_like: bool) -> AppResult<Like> {
        sqlx::query_as::<_, Like>(
            "UPDATE likes SET is_like = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_like)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update reaction"))?
        .ok_or_else(|| AppError::not_found(format!("Reaction {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete reaction"))?;
        Ok(result.rows_affected() > 0)
    }

    async fn counts(&self, post_id: Uuid) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*) FILTER (WHERE is_like), COUNT(*) FILTER (WHERE NOT is_like) \
             FROM likes WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count reactions"))
    }
}
