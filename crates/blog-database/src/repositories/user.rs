//! User repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::{PageRequest, PageResponse};
use blog_entity::user::{CreateUser, UpdateUser, User, UserRole};

use super::{db_error, violated_constraint};

/// Persistence operations on user accounts.
///
/// Usernames and emails are unique; violations surface as
/// [`blog_core::error::ErrorKind::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by username (case-insensitive).
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, newest first.
    async fn find_all(&self, page: PageRequest) -> AppResult<PageResponse<User>>;

    /// Insert a new user.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Apply a partial profile update.
    async fn update_profile(&self, id: Uuid, data: &UpdateUser) -> AppResult<User>;

    /// Change a user's role.
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User>;

    /// Activate or deactivate an account.
    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User>;

    /// Replace a user's password hash.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
}

/// PostgreSQL-backed [`UserRepository`].
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_unique(e: sqlx::Error, username: Option<&str>, context: &'static str) -> AppError {
    match violated_constraint(&e) {
        Some("users_username_key") => AppError::conflict(format!(
            "Username '{}' already exists",
            username.unwrap_or_default()
        )),
        Some("users_email_key") => AppError::conflict("Email already in use"),
        _ => db_error(context)(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by username"))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))
    }

    async fn find_all(&self, page: PageRequest) -> AppResult<PageResponse<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))?;

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))?;

        Ok(PageResponse::new(
            users,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users \
                (id, username, email, password_hash, first_name, last_name, role, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $8) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(data.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique(e, Some(&data.username), "Failed to create user"))
    }

    async fn update_profile(&self, id: Uuid, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = COALESCE($2, email), \
                              first_name = COALESCE($3, first_name), \
                              last_name = COALESCE($4, last_name), \
                              picture = COALESCE($5, picture), \
                              phone = COALESCE($6, phone), \
                              updated_at = $7 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.email)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.picture)
        .bind(&data.phone)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique(e, None, "Failed to update user"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update role"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update status"))?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to update password"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }
}
