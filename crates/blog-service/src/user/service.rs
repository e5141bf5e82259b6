//! Profile, role, status and password operations on user accounts.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use blog_auth::{AuthorizationGate, PasswordHasher, PasswordValidator};
use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_core::types::{PageRequest, PageResponse};
use blog_database::repositories::UserRepository;
use blog_entity::user::{UpdateUser, User, UserRole};

use crate::context::RequestContext;

/// Handles account reads and privileged account changes.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    gate: AuthorizationGate,
    hasher: PasswordHasher,
    validator: Arc<PasswordValidator>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserRepository>, validator: Arc<PasswordValidator>) -> Self {
        Self {
            users,
            gate: AuthorizationGate::new(),
            hasher: PasswordHasher::new(),
            validator,
        }
    }

    /// List all accounts (staff and above).
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<User>> {
        self.gate.enforce_role(ctx, UserRole::Staff)?;
        self.users.find_all(page).await
    }

    /// Read one account (the account itself, or staff).
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<User> {
        self.gate.enforce_owner_or_role(ctx, id, UserRole::Staff)?;
        self.find(id).await
    }

    /// Change profile fields (the account itself, or staff).
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        changes: UpdateUser,
    ) -> AppResult<User> {
        self.gate.enforce_owner_or_role(ctx, id, UserRole::Staff)?;

        if let Some(email) = &changes.email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("Email already registered"));
                }
            }
        }

        let user = self.users.update_profile(id, &changes).await?;
        info!(user_id = %id, actor = %ctx.user_id, "Profile updated");
        Ok(user)
    }

    /// Assign a role (superuser only).
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        role: UserRole,
    ) -> AppResult<User> {
        self.gate.enforce_role(ctx, UserRole::Superuser)?;
        if id == ctx.user_id && role != ctx.role {
            return Err(AppError::validation("You cannot change your own role"));
        }

        let user = self.users.update_role(id, role).await?;
        info!(user_id = %id, role = %role, actor = %ctx.user_id, "Role changed");
        Ok(user)
    }

    /// Activate or deactivate an account (staff and above).
    ///
    /// Accounts ranked above the actor cannot be changed, and nobody can
    /// deactivate themselves.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        is_active: bool,
    ) -> AppResult<User> {
        self.gate.enforce_role(ctx, UserRole::Staff)?;
        if id == ctx.user_id && !is_active {
            return Err(AppError::validation("You cannot deactivate your own account"));
        }

        let target = self.find(id).await?;
        if target.role.rank() > ctx.role.rank() {
            return Err(AppError::forbidden(
                "Cannot change the status of a more privileged account",
            ));
        }

        let user = self.users.set_active(id, is_active).await?;
        info!(user_id = %id, is_active, actor = %ctx.user_id, "Account status changed");
        Ok(user)
    }

    /// Change the caller's own password.
    pub async fn change_password(
        &self,
        ctx: &RequestContext,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.find(ctx.user_id).await?;

        if !self
            .hasher
            .verify_password(current_password, &user.password_hash)?
        {
            return Err(AppError::validation("Current password is incorrect"));
        }

        self.validator.validate(new_password)?;
        self.validator
            .validate_not_same(current_password, new_password)?;

        let new_hash = self.hasher.hash_password(new_password)?;
        self.users.update_password(ctx.user_id, &new_hash).await?;

        info!(user_id = %ctx.user_id, "Password changed");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
