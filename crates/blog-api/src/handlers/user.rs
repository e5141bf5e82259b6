//! User handlers: listing, profile, role, status, password.

use axum::Json;
use axum::extract::State;

use blog_core::types::PageResponse;

use crate::dto::request::{
    ChangePasswordRequest, ChangeRoleRequest, ChangeStatusRequest, UpdateUserRequest,
};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::{
    AuthUser, Authorized, IdPath, Pagination, StaffOnly, SuperuserOnly, ValidatedJson,
};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: Authorized<StaffOnly>,
    Pagination(page): Pagination,
) -> Result<Json<PageResponse<UserResponse>>, ApiError> {
    let users = state.user_service.list(&auth, page).await?;
    Ok(Json(users.map(UserResponse::from)))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.get(&auth, id).await?;
    Ok(Json(user.into()))
}

/// PATCH /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .update_profile(&auth, id, req.into())
        .await?;
    Ok(Json(user.into()))
}

/// PUT /api/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: Authorized<SuperuserOnly>,
    IdPath(id): IdPath,
    Json(req): Json<ChangeRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.change_role(&auth, id, req.role).await?;
    Ok(Json(user.into()))
}

/// PUT /api/users/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    auth: Authorized<StaffOnly>,
    IdPath(id): IdPath,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .set_active(&auth, id, req.is_active)
        .await?;
    Ok(Json(user.into()))
}

/// PUT /api/users/me/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .user_service
        .change_password(&auth, &req.current_password, &req.new_password)
        .await?;
    Ok(Json(MessageResponse::new("Password updated")))
}
