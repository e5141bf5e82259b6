//! Comment operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use blog_auth::AuthorizationGate;
use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_database::repositories::{CommentRepository, PostRepository};
use blog_entity::comment::{Comment, CommentNode, CreateComment};
use blog_entity::post::Post;
use blog_entity::user::UserRole;

use crate::context::RequestContext;
use crate::post::service::can_view;

/// Handles comments and replies with ownership checks.
#[derive(Debug, Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    gate: AuthorizationGate,
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(comments: Arc<dyn CommentRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            comments,
            posts,
            gate: AuthorizationGate::new(),
        }
    }

    /// Comment on a post, optionally replying to a comment on the same post.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        text: String,
        parent_id: Option<Uuid>,
    ) -> AppResult<Comment> {
        self.visible_post(Some(ctx), post_id).await?;

        if let Some(parent_id) = parent_id {
            let parent = self.find(parent_id).await?;
            if parent.post_id != post_id {
                return Err(AppError::validation(
                    "Parent comment belongs to a different post",
                ));
            }
        }

        let comment = self
            .comments
            .create(&CreateComment {
                user_id: ctx.user_id,
                post_id,
                parent_id,
                text,
            })
            .await?;
        info!(
            comment_id = %comment.id,
            post_id = %post_id,
            user_id = %ctx.user_id,
            "Comment created"
        );
        Ok(comment)
    }

    /// The comments of a post arranged as reply trees.
    pub async fn list_for_post(
        &self,
        viewer: Option<&RequestContext>,
        post_id: Uuid,
    ) -> AppResult<Vec<CommentNode>> {
        self.visible_post(viewer, post_id).await?;
        let comments = self.comments.find_by_post(post_id).await?;
        Ok(CommentNode::build_forest(comments))
    }

    /// Read a single comment. Comments on posts the viewer cannot see are
    /// reported as missing.
    pub async fn get(&self, viewer: Option<&RequestContext>, id: Uuid) -> AppResult<Comment> {
        let comment = self.find(id).await?;
        self.visible_post(viewer, comment.post_id)
            .await
            .map_err(|_| AppError::not_found("Comment not found"))?;
        Ok(comment)
    }

    /// Edit a comment (author or staff).
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        text: String,
    ) -> AppResult<Comment> {
        let comment = self.find(id).await?;
        self.gate
            .enforce_owner_or_role(ctx, comment.user_id, UserRole::Staff)?;

        let comment = self.comments.update_text(id, &text).await?;
        info!(comment_id = %id, actor = %ctx.user_id, "Comment updated");
        Ok(comment)
    }

    /// Delete a comment and its replies (author or staff).
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> AppResult<()> {
        let comment = self.find(id).await?;
        self.gate
            .enforce_owner_or_role(ctx, comment.user_id, UserRole::Staff)?;

        if !self.comments.delete(id).await? {
            return Err(AppError::not_found("Comment not found"));
        }
        info!(comment_id = %id, actor = %ctx.user_id, "Comment deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<Comment> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Comment not found"))
    }

    async fn visible_post(&self, viewer: Option<&RequestContext>, id: Uuid) -> AppResult<Post> {
        match self.posts.find_by_id(id).await? {
            Some(post) if can_view(&self.gate, viewer, &post) => Ok(post),
            _ => Err(AppError::not_found("Post not found")),
        }
    }
}
