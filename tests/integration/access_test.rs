//! Integration tests for role and ownership checks.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use blog_entity::user::UserRole;

use helpers::TestApp;

async fn create_post(app: &TestApp, token: &str, is_active: bool) -> String {
    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({
                "name": "first-post",
                "title": "First post",
                "text": "Hello world",
                "is_active": is_active,
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.str_field("id")
}

#[tokio::test]
async fn test_staff_endpoint_forbidden_for_user() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("sam", UserRole::Staff).await;

    let alice = app.token_for("alice").await;
    let response = app.request("GET", "/api/users", None, Some(&alice)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");

    let sam = app.token_for("sam").await;
    let response = app
        .request("GET", "/api/users?page=1&page_size=1", None, Some(&sam))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 2);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["has_next"], true);
}

#[tokio::test]
async fn test_owner_can_update_own_post() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("bob", UserRole::User).await;
    app.create_user("sam", UserRole::Staff).await;

    let alice = app.token_for("alice").await;
    let post_id = create_post(&app, &alice, true).await;
    let path = format!("/api/posts/{post_id}");

    let response = app
        .request("PUT", &path, Some(json!({"title": "Edited"})), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["title"], "Edited");
    assert_eq!(response.body["text"], "Hello world");

    let bob = app.token_for("bob").await;
    let response = app
        .request("PUT", &path, Some(json!({"title": "Mine now"})), Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.request("DELETE", &path, None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let sam = app.token_for("sam").await;
    let response = app.request("DELETE", &path, None, Some(&sam)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anonymous_cannot_write() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({"name": "n", "title": "t", "text": "x"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_access() {
    let app = TestApp::new();
    let alice = app.create_user("alice", UserRole::User).await;
    let bob = app.create_user("bob", UserRole::User).await;
    app.create_user("sam", UserRole::Staff).await;

    let alice_token = app.token_for("alice").await;
    let own = format!("/api/users/{}", alice.id);
    let other = format!("/api/users/{}", bob.id);

    let response = app.request("GET", &own, None, Some(&alice_token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "alice");

    let response = app.request("GET", &other, None, Some(&alice_token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PATCH",
            &own,
            Some(json!({"first_name": "Alicia", "phone": "555-0100"})),
            Some(&alice_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["first_name"], "Alicia");
    assert_eq!(response.body["phone"], "555-0100");

    let response = app
        .request(
            "PATCH",
            &own,
            Some(json!({"email": "bob@example.com"})),
            Some(&alice_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let sam = app.token_for("sam").await;
    let response = app.request("GET", &other, None, Some(&sam)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_role_change_applies_to_existing_tokens() {
    let app = TestApp::new();
    let alice = app.create_user("alice", UserRole::User).await;
    app.create_user("root", UserRole::Superuser).await;
    app.create_user("sam", UserRole::Staff).await;

    let alice_token = app.token_for("alice").await;
    let path = format!("/api/users/{}/role", alice.id);

    let sam = app.token_for("sam").await;
    let response = app
        .request("PUT", &path, Some(json!({"role": "staff"})), Some(&sam))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let root = app.token_for("root").await;
    let response = app
        .request("PUT", &path, Some(json!({"role": "staff"})), Some(&root))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "staff");

    let response = app
        .request("GET", "/api/users", None, Some(&alice_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let app = TestApp::new();
    let alice = app.create_user("alice", UserRole::User).await;
    app.create_user("root", UserRole::Superuser).await;
    let root = app.token_for("root").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/role", alice.id),
            Some(json!({"role": "emperor"})),
            Some(&root),
        )
        .await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_deactivation_revokes_access() {
    let app = TestApp::new();
    let alice = app.create_user("alice", UserRole::User).await;
    let root = app.create_user("root", UserRole::Superuser).await;
    let sam = app.create_user("sam", UserRole::Staff).await;

    let alice_token = app.token_for("alice").await;
    let sam_token = app.token_for("sam").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/status", alice.id),
            Some(json!({"is_active": false})),
            Some(&sam_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["is_active"], false);

    let response = app
        .request("GET", "/api/auth/me", None, Some(&alice_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/status", root.id),
            Some(json!({"is_active": false})),
            Some(&sam_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/status", sam.id),
            Some(json!({"is_active": false})),
            Some(&sam_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_inactive_posts_visibility() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("bob", UserRole::User).await;
    app.create_user("sam", UserRole::Staff).await;

    let alice = app.token_for("alice").await;
    let draft = create_post(&app, &alice, false).await;
    create_post(&app, &alice, true).await;
    let path = format!("/api/posts/{draft}");

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let bob = app.token_for("bob").await;
    let response = app.request("GET", &path, None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("GET", &path, None, Some(&alice)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/posts", None, None).await;
    assert_eq!(response.body["total_items"], 1);

    let response = app.request("GET", "/api/posts/all", None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let sam = app.token_for("sam").await;
    let response = app.request("GET", "/api/posts/all", None, Some(&sam)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_items"], 2);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let token = app.token_for("alice").await;

    let response = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({"current_password": "Wrong123!", "new_password": "Another456?"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({"current_password": helpers::PASSWORD, "new_password": "weak"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .request(
            "PUT",
            "/api/users/me/password",
            Some(json!({"current_password": helpers::PASSWORD, "new_password": "Another456?"})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request(
            "POST",
            "/api/auth/login-json",
            Some(json!({"username": "alice", "password": "Another456?"})),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_ids_are_rejected() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/posts/42", None, None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}
