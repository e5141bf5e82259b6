//! Repository bundle selected by `database.provider`.

use std::sync::Arc;

use tracing::info;

use blog_core::config::{DatabaseConfig, DatabaseProvider};
use blog_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::MemoryStore;
use crate::migration::run_migrations;
use crate::repositories::{
    CommentRepository, LikeRepository, PgCommentRepository, PgLikeRepository, PgPostRepository,
    PgUserRepository, PostRepository, UserRepository,
};

/// Every repository the services need, behind trait objects.
#[derive(Debug, Clone)]
pub struct Store {
    /// User accounts.
    pub users: Arc<dyn UserRepository>,
    /// Posts.
    pub posts: Arc<dyn PostRepository>,
    /// Comments.
    pub comments: Arc<dyn CommentRepository>,
    /// Reactions.
    pub likes: Arc<dyn LikeRepository>,
    pool: Option<DatabasePool>,
}

impl Store {
    /// Build the store for the configured provider, applying migrations when
    /// the provider is PostgreSQL and `run_migrations` is set.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            DatabaseProvider::Postgres => {
                info!("Initializing PostgreSQL store");
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
            DatabaseProvider::Memory => {
                info!("Initializing in-memory store");
                Ok(Self::memory())
            }
        }
    }

    /// Repositories over an open PostgreSQL pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            likes: Arc::new(PgLikeRepository::new(pool)),
            pool: Some(db),
        }
    }

    /// Repositories over a fresh in-memory store.
    pub fn memory() -> Self {
        let store = MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            likes: Arc::new(store),
            pool: None,
        }
    }

    /// Whether the backing store is reachable. Always `true` for memory.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(db) => db.health_check().await,
            None => Ok(true),
        }
    }

    /// Provider name for diagnostics.
    pub fn provider_name(&self) -> &'static str {
        if self.pool.is_some() { "postgres" } else { "memory" }
    }
}
