//! Post repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::{PageRequest, PageResponse};
use blog_entity::post::{CreatePost, Post, UpdatePost};

use super::db_error;

/// Persistence operations on posts.
#[async_trait]
pub trait PostRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new post.
    async fn create(&self, data: &CreatePost) -> AppResult<Post>;

    /// Find a post by primary key, active or not.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>>;

    /// List active posts, newest first.
    async fn find_active(&self, page: PageRequest) -> AppResult<PageResponse<Post>>;

    /// List every post including inactive ones, newest first.
    async fn find_all(&self, page: PageRequest) -> AppResult<PageResponse<Post>>;

    /// Apply a partial update.
    async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Post>;

    /// Delete a post together with its comments and likes.
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL-backed [`PostRepository`].
#[derive(Debug, Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn page(&self, only_active: bool, page: PageRequest) -> AppResult<PageResponse<Post>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE ($1 = FALSE OR is_active)")
                .bind(only_active)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count posts"))?;

        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE ($1 = FALSE OR is_active) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(only_active)
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list posts"))?;

        Ok(PageResponse::new(
            posts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        let now = Utc::now();
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, user_id, name, title, text, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.name)
        .bind(&data.title)
        .bind(&data.text)
        .bind(data.is_active)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create post"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find post"))
    }

    async fn find_active(&self, page: PageRequest) -> AppResult<PageResponse<Post>> {
        self.page(true, page).await
    }

    async fn find_all(&self, page: PageRequest) -> AppResult<PageResponse<Post>> {
        self.page(false, page).await
    }

    async fn update(&self, id: Uuid, data: &UpdatePost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET name = COALESCE($2, name), \
                              title = COALESCE($3, title), \
                              text = COALESCE($4, text), \
                              is_active = COALESCE($5, is_active), \
                              updated_at = $6 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.title)
        .bind(&data.text)
        .bind(data.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update post"))?
        .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete post"))?;
        Ok(result.rows_affected() > 0)
    }
}
