//! Authentication extractors.
//!
//! The token is read through the configured [`SessionTransport`], verified by
//! the auth service, and resolved against the stored user so that role
//! changes and deactivation take effect immediately.
//!
//! [`SessionTransport`]: crate::session::SessionTransport

use std::marker::PhantomData;
use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use blog_auth::AuthorizationGate;
use blog_core::error::AppError;
use blog_entity::user::UserRole;
use blog_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Message for requests that carry no token at all.
const NOT_AUTHENTICATED: &str = "Not authenticated";

/// Resolve the caller, if the request carries a token.
async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<RequestContext>, ApiError> {
    let Some(token) = state.transport.extract(&parts.headers) else {
        return Ok(None);
    };
    let ctx = state.auth_service.authenticate_token(&token).await?;
    Ok(Some(ctx))
}

/// Authenticated caller. Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(AuthUser)
            .ok_or_else(|| ApiError(AppError::unauthorized(NOT_AUTHENTICATED)))
    }
}

/// Optional caller. Anonymous when no token is sent; a token that fails
/// verification is still rejected with 401.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<RequestContext>);

impl MaybeAuthUser {
    /// The caller's context, if authenticated.
    pub fn context(&self) -> Option<&RequestContext> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthUser(resolve(parts, state).await?))
    }
}

/// Minimum role demanded by an [`Authorized`] extractor.
pub trait RoleRequirement: Send + Sync + 'static {
    /// The lowest role that passes.
    const MINIMUM: UserRole;
}

/// Staff and superusers.
#[derive(Debug, Clone, Copy)]
pub struct StaffOnly;

impl RoleRequirement for StaffOnly {
    const MINIMUM: UserRole = UserRole::Staff;
}

/// Superusers only.
#[derive(Debug, Clone, Copy)]
pub struct SuperuserOnly;

impl RoleRequirement for SuperuserOnly {
    const MINIMUM: UserRole = UserRole::Superuser;
}

/// Authenticated caller holding at least `R::MINIMUM`; 403 otherwise.
#[derive(Debug, Clone)]
pub struct Authorized<R> {
    ctx: RequestContext,
    _role: PhantomData<R>,
}

impl<R> Authorized<R> {
    /// The caller's context.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }
}

impl<R> Deref for Authorized<R> {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl<R: RoleRequirement> FromRequestParts<AppState> for Authorized<R> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(ctx) = AuthUser::from_request_parts(parts, state).await?;
        AuthorizationGate::new().enforce_role(&ctx, R::MINIMUM)?;
        Ok(Self {
            ctx,
            _role: PhantomData,
        })
    }
}
