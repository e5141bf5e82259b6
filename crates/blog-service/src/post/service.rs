//! Post operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use blog_auth::AuthorizationGate;
use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::{PageRequest, PageResponse};
use blog_database::repositories::PostRepository;
use blog_entity::post::{CreatePost, Post, UpdatePost};
use blog_entity::user::UserRole;

use crate::context::RequestContext;

/// Fields supplied by the author of a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Short name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Body text.
    pub text: String,
    /// Initial visibility.
    pub is_active: bool,
}

/// Whether `viewer` may see `post`.
///
/// Active posts are public; inactive ones are visible to their author and
/// to staff.
pub(crate) fn can_view(
    gate: &AuthorizationGate,
    viewer: Option<&RequestContext>,
    post: &Post,
) -> bool {
    post.is_active
        || viewer.is_some_and(|ctx| {
            gate.require_owner_or_role(ctx, post.user_id, UserRole::Staff)
                .is_allowed()
        })
}

/// Handles post CRUD with ownership checks.
#[derive(Debug, Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    gate: AuthorizationGate,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            gate: AuthorizationGate::new(),
        }
    }

    /// Publish a post owned by the caller.
    pub async fn create(&self, ctx: &RequestContext, draft: NewPost) -> AppResult<Post> {
        let post = self
            .posts
            .create(&CreatePost {
                user_id: ctx.user_id,
                name: draft.name,
                title: draft.title,
                text: draft.text,
                is_active: draft.is_active,
            })
            .await?;
        info!(post_id = %post.id, user_id = %ctx.user_id, "Post created");
        Ok(post)
    }

    /// Read a post. Inactive posts look missing to everyone but the author
    /// and staff.
    pub async fn get(&self, viewer: Option<&RequestContext>, id: Uuid) -> AppResult<Post> {
        let post = self.find(id).await?;
        if can_view(&self.gate, viewer, &post) {
            Ok(post)
        } else {
            Err(AppError::not_found("Post not found"))
        }
    }

    /// Public listing of active posts.
    pub async fn list_public(&self, page: PageRequest) -> AppResult<PageResponse<Post>> {
        self.posts.find_active(page).await
    }

    /// Every post including inactive ones (staff and above).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<Post>> {
        self.gate.enforce_role(ctx, UserRole::Staff)?;
        self.posts.find_all(page).await
    }

    /// Edit a post (author or staff).
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        changes: UpdatePost,
    ) -> AppResult<Post> {
        let post = self.find(id).await?;
        self.gate
            .enforce_owner_or_role(ctx, post.user_id, UserRole::Staff)?;

        let post = self.posts.update(id, &changes).await?;
        info!(post_id = %id, actor = %ctx.user_id, "Post updated");
        Ok(post)
    }

    /// Delete a post with its comments and likes (author or staff).
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let post = self.find(id).await?;
        self.gate
            .enforce_owner_or_role(ctx, post.user_id, UserRole::Staff)?;

        if !self.posts.delete(id).await? {
            return Err(AppError::not_found("Post not found"));
        }
        info!(post_id = %id, actor = %ctx.user_id, "Post deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))
    }
}
