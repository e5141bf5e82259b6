//! Credential checks and token lifecycle.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use blog_auth::jwt::IssuedToken;
use blog_auth::{
    PasswordHasher, PasswordValidator, TokenError, TokenPair, TokenService, TokenSubject,
};
use blog_core::config::AdminConfig;
use blog_core::error::AppError;
use blog_core::result::AppResult;
use blog_database::repositories::UserRepository;
use blog_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

/// Message returned for every failed login.
const INVALID_CREDENTIALS: &str = "Invalid credentials";
/// Message returned for every rejected token or vanished subject.
const UNAUTHENTICATED: &str = "Could not validate credentials";

/// Data required to register an account.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// A logged-in user together with a fresh token pair.
#[derive(Debug, Clone)]
pub struct Session {
    /// The authenticated user.
    pub user: User,
    /// Newly issued tokens.
    pub tokens: TokenPair,
}

/// Result of exchanging a refresh token.
#[derive(Debug, Clone)]
pub struct RefreshedAccess {
    /// The still-active user the token belongs to.
    pub user: User,
    /// The new access token.
    pub access: IssuedToken,
}

/// Orchestrates credential checks and token issue.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
    validator: Arc<PasswordValidator>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        validator: Arc<PasswordValidator>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher: PasswordHasher::new(),
            validator,
        }
    }

    /// The token service used for issuing and verification.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Create a regular account and log it in.
    pub async fn register(&self, data: Registration) -> AppResult<Session> {
        self.validator.validate(&data.password)?;

        if self.users.find_by_username(&data.username).await?.is_some() {
            return Err(AppError::conflict("Username already registered"));
        }
        if self.users.find_by_email(&data.email).await?.is_some() {
            return Err(AppError::conflict("Email already registered"));
        }

        let password_hash = self.hasher.hash_password(&data.password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: data.username,
                email: data.email,
                password_hash,
                first_name: data.first_name,
                last_name: data.last_name,
                role: UserRole::User,
            })
            .await?;

        let tokens = self.tokens.issue(&TokenSubject::from(&user))?;
        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(Session { user, tokens })
    }

    /// Check a username/password pair and issue tokens.
    ///
    /// Unknown users, wrong passwords and disabled accounts all yield the
    /// same `Unauthorized` error.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Session> {
        let Some(user) = self.users.find_by_username(username).await? else {
            self.hasher.verify_dummy(password);
            info!(username = %username, "Login failed: unknown user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !self.hasher.verify_password(password, &user.password_hash)? {
            info!(user_id = %user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "Login refused: account disabled");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let tokens = self.tokens.issue(&TokenSubject::from(&user))?;
        info!(user_id = %user.id, "Login successful");
        Ok(Session { user, tokens })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The user must still exist and be active. The refresh token is left
    /// untouched and stays valid until it expires.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshedAccess> {
        let (claims, access) = self
            .tokens
            .refresh(refresh_token)
            .map_err(|e| log_token_failure("refresh", e))?;

        let user = self.active_user(claims.user_id()).await?;
        debug!(user_id = %user.id, "Access token refreshed");
        Ok(RefreshedAccess { user, access })
    }

    /// Turn a raw access token into a request context.
    pub async fn authenticate_token(&self, token: &str) -> AppResult<RequestContext> {
        let claims = self
            .tokens
            .verify(token)
            .map_err(|e| log_token_failure("access", e))?;
        let user = self.active_user(claims.user_id()).await?;
        Ok(RequestContext::from(&user))
    }

    /// Load the user behind a context.
    pub async fn current_user(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Create or promote the configured superuser.
    ///
    /// Does nothing unless `admin.bootstrap` is set. An existing account with
    /// the configured username is promoted rather than recreated.
    pub async fn bootstrap_superuser(&self, admin: &AdminConfig) -> AppResult<Option<User>> {
        if !admin.bootstrap {
            return Ok(None);
        }

        if let Some(existing) = self.users.find_by_username(&admin.username).await? {
            if existing.role == UserRole::Superuser {
                debug!(username = %existing.username, "Superuser already present");
                return Ok(Some(existing));
            }
            let promoted = self
                .users
                .update_role(existing.id, UserRole::Superuser)
                .await?;
            info!(username = %promoted.username, "Promoted existing user to superuser");
            return Ok(Some(promoted));
        }

        let password = admin
            .password
            .as_deref()
            .ok_or_else(|| AppError::configuration("admin.password must be set to bootstrap"))?;
        let password_hash = self.hasher.hash_password(password)?;
        let user = self
            .users
            .create(&CreateUser {
                username: admin.username.clone(),
                email: admin.email.clone(),
                password_hash,
                first_name: "Admin".to_string(),
                last_name: "User".to_string(),
                role: UserRole::Superuser,
            })
            .await?;

        info!(username = %user.username, "Superuser created");
        Ok(Some(user))
    }

    async fn active_user(&self, id: Uuid) -> AppResult<User> {
        match self.users.find_by_id(id).await? {
            Some(user) if user.is_active => Ok(user),
            Some(user) => {
                warn!(user_id = %user.id, "Token presented for a disabled account");
                Err(AppError::unauthorized(UNAUTHENTICATED))
            }
            None => {
                warn!(user_id = %id, "Token presented for an unknown user");
                Err(AppError::unauthorized(UNAUTHENTICATED))
            }
        }
    }
}

fn log_token_failure(kind: &'static str, err: TokenError) -> AppError {
    match &err {
        TokenError::TokenExpired => debug!(token = kind, "Rejected expired token"),
        TokenError::TokenInvalid => warn!(token = kind, "Rejected invalid token"),
        TokenError::Encoding(msg) => error!(token = kind, error = %msg, "Token encoding failed"),
    }
    err.into()
}
