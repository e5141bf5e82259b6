//! Like/dislike handlers.

use axum::Json;
use axum::extract::State;

use blog_entity::like::{LikeStats, ToggleOutcome};

use crate::dto::request::ToggleLikeQuery;
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, MaybeAuthUser, ValidatedQuery};
use crate::state::AppState;

/// POST /api/posts/{id}/likes/toggle?is_like=
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedQuery(query): ValidatedQuery<ToggleLikeQuery>,
) -> Result<Json<ToggleOutcome>, ApiError> {
    let outcome = state
        .like_service
        .toggle(&auth, post_id, query.is_like)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/posts/{id}/likes
pub async fn like_stats(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    IdPath(post_id): IdPath,
) -> Result<Json<LikeStats>, ApiError> {
    Ok(Json(
        state.like_service.stats(viewer.context(), post_id).await?,
    ))
}
