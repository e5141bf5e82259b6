//! Shared fixtures for service unit tests.

use std::sync::Arc;

use blog_auth::{ManualClock, PasswordHasher, PasswordValidator, TokenService};
use blog_core::config::AuthConfig;
use blog_database::Store;
use blog_entity::user::{CreateUser, User, UserRole};

use crate::context::RequestContext;

pub const PASSWORD: &str = "Secret123!";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "unit-test-secret-with-at-least-32-chars".to_string(),
        ..AuthConfig::default()
    }
}

pub fn tokens(clock: Arc<ManualClock>) -> Arc<TokenService> {
    Arc::new(TokenService::with_clock(&auth_config(), clock).unwrap())
}

pub fn validator() -> Arc<PasswordValidator> {
    Arc::new(PasswordValidator::new(&auth_config()))
}

pub async fn seed_user(store: &Store, username: &str, role: UserRole) -> (User, RequestContext) {
    let user = store
        .users
        .create(&CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: PasswordHasher::new().hash_password(PASSWORD).unwrap(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role,
        })
        .await
        .unwrap();
    let ctx = RequestContext::from(&user);
    (user, ctx)
}
