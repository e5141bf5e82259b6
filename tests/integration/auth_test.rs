//! Integration tests for the authentication flow.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use blog_core::config::TransportMode;
use blog_entity::user::UserRole;

use helpers::{PASSWORD, TestApp};

fn registration(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
        "first_name": "Alice",
        "last_name": "Liddell",
    })
}

#[tokio::test]
async fn test_register_returns_tokens_and_cookies() {
    let app = TestApp::new();

    let response = app
        .request("POST", "/api/auth/register", Some(registration("alice")), None)
        .await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["token_type"], "bearer");
    assert_eq!(response.body["expires_in"], 1800);
    assert_eq!(response.body["user"]["username"], "alice");
    assert_eq!(response.body["user"]["role"], "user");
    assert!(response.body["user"].get("password_hash").is_none());

    let access = response.set_cookie("access_token").expect("access cookie");
    assert!(access.contains("HttpOnly"));
    let refresh = response.set_cookie("refresh_token").expect("refresh cookie");
    assert!(refresh.contains("Path=/api/auth"));
    assert_eq!(
        response.cookie_value("access_token").unwrap(),
        response.str_field("access_token")
    );
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new();
    app.request("POST", "/api/auth/register", Some(registration("alice")), None)
        .await;

    let mut again = registration("ALICE");
    again["email"] = json!("other@example.com");
    let response = app
        .request("POST", "/api/auth/register", Some(again), None)
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = TestApp::new();

    let mut weak = registration("alice");
    weak["password"] = json!("password");
    let response = app
        .request("POST", "/api/auth/register", Some(weak), None)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .request("POST", "/api/auth/register", Some(registration("a!")), None)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");

    let response = app
        .request("POST", "/api/auth/register", Some(json!({"username": "bob"})), None)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_form_and_json() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;

    for path in ["/api/auth/login", "/api/auth/login-form"] {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=alice&password=Secret123%21"))
            .unwrap();
        let response = app.send(req).await;
        assert_eq!(response.status, StatusCode::OK, "{path}: {:?}", response.body);
        assert_eq!(response.body["user"]["username"], "alice");
    }

    let response = app.login("alice").await;
    assert!(!response.str_field("refresh_token").is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    let carol = app.create_user("carol", UserRole::User).await;
    app.create_user("alice", UserRole::User).await;
    app.store.users.set_active(carol.id, false).await.unwrap();

    let attempts = [
        json!({"username": "alice", "password": "Wrong123!"}),
        json!({"username": "nobody", "password": PASSWORD}),
        json!({"username": "carol", "password": PASSWORD}),
    ];
    for body in attempts {
        let response = app
            .request("POST", "/api/auth/login-json", Some(body), None)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_me_requires_credentials() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[header::WWW_AUTHENTICATE], "Bearer");

    let response = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Could not validate credentials");
}

#[tokio::test]
async fn test_me_with_bearer_and_cookie() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let login = app.login("alice").await;

    let token = login.str_field("access_token");
    let response = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");

    let cookie = format!("access_token={}", login.cookie_value("access_token").unwrap());
    let response = app.request_with_cookie("GET", "/api/auth/me", &cookie).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let token = app.token_for("alice").await;

    let sig_start = token.rfind('.').unwrap() + 1;
    let first = &token[sig_start..sig_start + 1];
    let replacement = if first == "A" { "Z" } else { "A" };
    let tampered = format!(
        "{}{}{}",
        &token[..sig_start],
        replacement,
        &token[sig_start + 1..]
    );

    let response = app
        .request("GET", "/api/auth/me", None, Some(&tampered))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_via_cookie_reissues_access_only() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let login = app.login("alice").await;
    let refresh_token = login.cookie_value("refresh_token").unwrap();

    let response = app
        .request_with_cookie(
            "POST",
            "/api/auth/refresh",
            &format!("refresh_token={refresh_token}"),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.str_field("refresh_token"), refresh_token);
    assert_eq!(response.body["user"]["username"], "alice");
    assert!(response.set_cookie("access_token").is_some());
    assert!(response.set_cookie("refresh_token").is_none());
}

#[tokio::test]
async fn test_refresh_via_body() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let login = app.login("alice").await;

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": login.str_field("refresh_token")})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let access = response.str_field("access_token");
    let me = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_rejections() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let login = app.login("alice").await;

    let response = app.request("POST", "/api/auth/refresh", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Refresh token not found");

    // An access token is not accepted where a refresh token is expected.
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": login.str_field("access_token")})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let refresh = app.login("alice").await.str_field("refresh_token");

    let response = app.request("GET", "/api/auth/me", None, Some(&refresh)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_then_refresh() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let login = app.login("alice").await;
    let access = login.str_field("access_token");
    let refresh = login.str_field("refresh_token");

    app.advance_minutes(31);
    let response = app.request("GET", "/api/auth/me", None, Some(&access)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let renewed = response.str_field("access_token");

    app.advance_minutes(29);
    let response = app.request("GET", "/api/auth/me", None, Some(&renewed)).await;
    assert_eq!(response.status, StatusCode::OK);

    app.advance_minutes(2);
    let response = app.request("GET", "/api/auth/me", None, Some(&renewed)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_refresh_token() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let refresh = app.login("alice").await.str_field("refresh_token");

    app.advance_minutes(7 * 24 * 60 + 1);
    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_requires_active_user() {
    let app = TestApp::new();
    let alice = app.create_user("alice", UserRole::User).await;
    let refresh = app.login("alice").await.str_field("refresh_token");

    app.store.users.set_active(alice.id, false).await.unwrap();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({"refresh_token": refresh})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let login = app.login("alice").await;
    let cookie = format!("access_token={}", login.cookie_value("access_token").unwrap());

    let response = app
        .request_with_cookie("POST", "/api/auth/logout", &cookie)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Successfully logged out");

    for name in ["access_token", "refresh_token"] {
        let line = response.set_cookie(name).expect("removal cookie");
        assert!(line.contains("Max-Age=0"), "{line}");
    }

    // Logging out twice is fine.
    let response = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bearer_transport_uses_headers() {
    let mut config = helpers::test_config();
    config.auth.transport = TransportMode::Bearer;
    let app = TestApp::with_config(config);
    app.create_user("alice", UserRole::User).await;

    let login = app.login("alice").await;
    assert!(login.set_cookies().is_empty());
    let access = login.headers["x-access-token"].to_str().unwrap().to_string();
    assert_eq!(access, login.str_field("access_token"));
    let refresh = login.headers["x-refresh-token"].to_str().unwrap().to_string();

    // Cookies are not a carrier in bearer mode.
    let response = app
        .request_with_cookie("GET", "/api/auth/me", &format!("access_token={access}"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/refresh")
        .header("x-refresh-token", refresh)
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key("x-access-token"));
    assert!(!response.headers.contains_key("x-refresh-token"));
}

#[tokio::test]
async fn test_health_and_request_metadata() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
    assert!(response.headers.contains_key("x-request-id"));
    assert!(response.headers.contains_key("x-process-time-ms"));

    let req = Request::builder()
        .uri("/api/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = app.send(req).await;
    assert_eq!(response.headers["x-request-id"], "trace-me");
}
