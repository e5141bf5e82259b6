//! Like/dislike toggling and counts.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use blog_auth::AuthorizationGate;
use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_database::repositories::{LikeRepository, PostRepository};
use blog_entity::like::{LikeStats, ToggleOutcome};

use crate::context::RequestContext;
use crate::post::service::can_view;

/// Handles reactions to posts.
#[derive(Debug, Clone)]
pub struct LikeService {
    likes: Arc<dyn LikeRepository>,
    posts: Arc<dyn PostRepository>,
    gate: AuthorizationGate,
}

impl LikeService {
    /// Creates a new like service.
    pub fn new(likes: Arc<dyn LikeRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self {
            likes,
            posts,
            gate: AuthorizationGate::new(),
        }
    }

    /// Toggle the caller's reaction.
    ///
    /// No reaction yet: record `is_like`. Same value again: remove it.
    /// Opposite value: switch it.
    pub async fn toggle(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        is_like: bool,
    ) -> AppResult<ToggleOutcome> {
        self.ensure_visible(Some(ctx), post_id).await?;

        let liked = match self.likes.find(ctx.user_id, post_id).await? {
            None => {
                self.likes.create(ctx.user_id, post_id, is_like).await?;
                Some(is_like)
            }
            Some(existing) if existing.is_like == is_like => {
                self.likes.delete(existing.id).await?;
                None
            }
            Some(existing) => {
                self.likes.set_reaction(existing.id, is_like).await?;
                Some(is_like)
            }
        };
        debug!(post_id = %post_id, user_id = %ctx.user_id, liked = ?liked, "Reaction toggled");

        let (likes_count, dislikes_count) = self.likes.counts(post_id).await?;
        Ok(ToggleOutcome {
            liked,
            likes_count,
            dislikes_count,
        })
    }

    /// Reaction counts, plus the viewer's own reaction when authenticated.
    pub async fn stats(
        &self,
        viewer: Option<&RequestContext>,
        post_id: Uuid,
    ) -> AppResult<LikeStats> {
        self.ensure_visible(viewer, post_id).await?;

        let (likes_count, dislikes_count) = self.likes.counts(post_id).await?;
        let user_liked = match viewer {
            Some(ctx) => self
                .likes
                .find(ctx.user_id, post_id)
                .await?
                .map(|like| like.is_like),
            None => None,
        };
        Ok(LikeStats {
            likes_count,
            dislikes_count,
            user_liked,
        })
    }

    async fn ensure_visible(
        &self,
        viewer: Option<&RequestContext>,
        post_id: Uuid,
    ) -> AppResult<()> {
        match self.posts.find_by_id(post_id).await? {
            Some(post) if can_view(&self.gate, viewer, &post) => Ok(()),
            _ => Err(AppError::not_found("Post not found")),
        }
    }
}
