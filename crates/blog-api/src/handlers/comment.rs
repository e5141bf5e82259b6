//! Comment handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use blog_entity::comment::{Comment, CommentNode};

use crate::dto::request::{CreateCommentRequest, UpdateCommentRequest};
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(post_id): IdPath,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state
        .comment_service
        .create(&auth, post_id, req.text, req.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/posts/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    IdPath(post_id): IdPath,
) -> Result<Json<Vec<CommentNode>>, ApiError> {
    let threads = state
        .comment_service
        .list_for_post(viewer.context(), post_id)
        .await?;
    Ok(Json(threads))
}

/// GET /api/comments/{id}
pub async fn get_comment(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Comment>, ApiError> {
    Ok(Json(state.comment_service.get(viewer.context(), id).await?))
}

/// PUT /api/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    Ok(Json(state.comment_service.update(&auth, id, req.text).await?))
}

/// DELETE /api/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.comment_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
