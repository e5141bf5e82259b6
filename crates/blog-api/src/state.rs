//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use blog_core::config::AppConfig;
use blog_database::Store;
use blog_service::{AuthService, CommentService, LikeService, PostService, UserService};

use crate::session::SessionTransport;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Repositories (PostgreSQL or in-memory)
    pub store: Store,
    /// Cookie or bearer token carrier
    pub transport: Arc<dyn SessionTransport>,

    // ── Services ─────────────────────────────────────────────
    /// Registration, login, refresh and token authentication
    pub auth_service: Arc<AuthService>,
    /// Account administration
    pub user_service: Arc<UserService>,
    /// Post CRUD
    pub post_service: Arc<PostService>,
    /// Threaded comments
    pub comment_service: Arc<CommentService>,
    /// Likes and dislikes
    pub like_service: Arc<LikeService>,
}
