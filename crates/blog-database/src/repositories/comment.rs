//! Comment repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_entity::comment::{Comment, CreateComment};

use super::db_error;

/// Persistence operations on comments.
#[async_trait]
pub trait CommentRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new comment.
    async fn create(&self, data: &CreateComment) -> AppResult<Comment>;

    /// Find a comment by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>>;

    /// All comments of a post, oldest first.
    async fn find_by_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>>;

    /// Replace a comment's text.
    async fn update_text(&self, id: Uuid, text: &str) -> AppResult<Comment>;

    /// Delete a comment and, transitively, its replies.
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed [`CommentRepository`].
#[derive(Debug, Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn create(&self, data: &CreateComment) -> AppResult<Comment> {
        let now = Utc::now();
        sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (id, user_id, post_id, parent_id, text, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.post_id)
        .bind(data.parent_id)
        .bind(&data.text)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create comment"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find comment"))
    }

    async fn find_by_post(&self, post_id: Uuid) -> AppResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list comments"))
    }

    async fn update_text(&self, id: Uuid, text: &str) -> AppResult<Comment> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET text = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(text)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update comment"))?
        .ok_or_else(|| AppError::not_found(format!("Comment {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // Replies go with their parent through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete comment"))?;
        Ok(result.rows_affected() > 0)
    }
}
