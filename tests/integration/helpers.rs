//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::Value;
use tower::ServiceExt;

use blog_auth::{ManualClock, PasswordHasher};
use blog_core::config::{AppConfig, AuthConfig, DatabaseConfig, DatabaseProvider};
use blog_database::Store;
use blog_entity::user::{CreateUser, User, UserRole};

/// Password given to every seeded account.
pub const PASSWORD: &str = "Secret123!";

/// Configuration with an in-memory store and a fixed secret.
pub fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            jwt_secret: "integration-test-secret-0123456789abcdef".to_string(),
            ..AuthConfig::default()
        },
        database: DatabaseConfig {
            provider: DatabaseProvider::Memory,
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store behind the router, for seeding
    pub store: Store,
    /// Clock read by the token service
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let store = Store::memory();
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = blog_api::build_state(config, store.clone(), clock.clone())
            .expect("Failed to build state");

        Self {
            router: blog_api::build_app(state),
            store,
            clock,
        }
    }

    /// Move the token clock forward.
    pub fn advance_minutes(&self, minutes: i64) {
        self.clock.advance(Duration::minutes(minutes));
    }

    /// Create an account directly in the store
    pub async fn create_user(&self, username: &str, role: UserRole) -> User {
        self.store
            .users
            .create(&CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: PasswordHasher::new()
                    .hash_password(PASSWORD)
                    .expect("Failed to hash password"),
                first_name: "Test".to_string(),
                last_name: username.to_string(),
                role,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Log in through the JSON endpoint and return the response
    pub async fn login(&self, username: &str) -> TestResponse {
        let response = self
            .request(
                "POST",
                "/api/auth/login-json",
                Some(serde_json::json!({
                    "username": username,
                    "password": PASSWORD,
                })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response
    }

    /// Log in and return the access token
    pub async fn token_for(&self, username: &str) -> String {
        self.login(username).await.str_field("access_token")
    }

    /// Make a JSON request, optionally with a bearer token
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(req).await
    }

    /// Make a request that carries a `Cookie` header
    pub async fn request_with_cookie(
        &self,
        method: &str,
        path: &str,
        cookie: &str,
    ) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a prepared request to the router
    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// A string field of the JSON body.
    pub fn str_field(&self, name: &str) -> String {
        self.body
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_else(|| panic!("No {name} in {:?}", self.body))
            .to_string()
    }

    /// Every `Set-Cookie` header.
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().expect("Non-ASCII cookie").to_string())
            .collect()
    }

    /// The full `Set-Cookie` line for `name`.
    pub fn set_cookie(&self, name: &str) -> Option<String> {
        let prefix = format!("{name}=");
        self.set_cookies()
            .into_iter()
            .find(|c| c.starts_with(&prefix))
    }

    /// The value set for cookie `name`.
    pub fn cookie_value(&self, name: &str) -> Option<String> {
        self.set_cookie(name).map(|line| {
            let pair = line.split(';').next().unwrap_or_default();
            pair[name.len() + 1..].to_string()
        })
    }
}
