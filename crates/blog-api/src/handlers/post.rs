//! Post handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use blog_core::types::PageResponse;
use blog_entity::post::Post;

use crate::dto::request::{CreatePostRequest, UpdatePostRequest};
use crate::error::ApiError;
use crate::extractors::{
    AuthUser, Authorized, IdPath, MaybeAuthUser, Pagination, StaffOnly, ValidatedJson,
};
use crate::state::AppState;

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    let post = state.post_service.create(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Pagination(page): Pagination,
) -> Result<Json<PageResponse<Post>>, ApiError> {
    Ok(Json(state.post_service.list_public(page).await?))
}

/// GET /api/posts/all
pub async fn list_all_posts(
    State(state): State<AppState>,
    auth: Authorized<StaffOnly>,
    Pagination(page): Pagination,
) -> Result<Json<PageResponse<Post>>, ApiError> {
    Ok(Json(state.post_service.list_all(&auth, page).await?))
}

/// GET /api/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    IdPath(id): IdPath,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.post_service.get(viewer.context(), id).await?))
}

/// PUT /api/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    Ok(Json(state.post_service.update(&auth, id, req.into()).await?))
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.post_service.delete(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
