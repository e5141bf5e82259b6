//! Integration tests for posts, comments and likes.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use blog_entity::user::UserRole;

use helpers::TestApp;

async fn create_post(app: &TestApp, token: &str, title: &str) -> String {
    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({"name": title.to_lowercase(), "title": title, "text": "Body"})),
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.str_field("id")
}

async fn comment(
    app: &TestApp,
    token: &str,
    post_id: &str,
    text: &str,
    parent_id: Option<&str>,
) -> helpers::TestResponse {
    app.request(
        "POST",
        &format!("/api/posts/{post_id}/comments"),
        Some(json!({"text": text, "parent_id": parent_id})),
        Some(token),
    )
    .await
}

async fn toggle(app: &TestApp, token: &str, post_id: &str, is_like: bool) -> Value {
    let response = app
        .request(
            "POST",
            &format!("/api/posts/{post_id}/likes/toggle?is_like={is_like}"),
            None,
            Some(token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body
}

#[tokio::test]
async fn test_post_pagination() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let alice = app.token_for("alice").await;

    for title in ["One", "Two", "Three"] {
        create_post(&app, &alice, title).await;
    }

    let response = app
        .request("GET", "/api/posts?page=1&page_size=2", None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 2);
    assert_eq!(response.body["total_items"], 3);
    assert_eq!(response.body["total_pages"], 2);
    assert_eq!(response.body["has_next"], true);

    let response = app
        .request("GET", "/api/posts?page=2&page_size=2", None, None)
        .await;
    assert_eq!(response.body["items"].as_array().unwrap().len(), 1);
    assert_eq!(response.body["has_previous"], true);

    let response = app
        .request("GET", "/api/posts?page=abc", None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_huge_page_number_returns_empty_page() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let alice = app.token_for("alice").await;
    create_post(&app, &alice, "Only").await;

    let response = app
        .request(
            "GET",
            "/api/posts?page=18446744073709551615&page_size=100",
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["items"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["total_items"], 1);
    assert_eq!(response.body["has_next"], false);
}

#[tokio::test]
async fn test_threaded_comments() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("bob", UserRole::User).await;
    let alice = app.token_for("alice").await;
    let bob = app.token_for("bob").await;
    let post_id = create_post(&app, &alice, "Threads").await;

    let root = comment(&app, &bob, &post_id, "Nice post", None).await;
    assert_eq!(root.status, StatusCode::CREATED);
    let root_id = root.str_field("id");

    let reply = comment(&app, &alice, &post_id, "Thanks", Some(&root_id)).await;
    assert_eq!(reply.status, StatusCode::CREATED);
    assert_eq!(reply.body["parent_id"], root_id.as_str());

    let response = app
        .request("GET", &format!("/api/posts/{post_id}/comments"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let threads = response.body.as_array().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["text"], "Nice post");
    assert_eq!(threads[0]["replies"][0]["text"], "Thanks");
}

#[tokio::test]
async fn test_reply_must_stay_on_same_post() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let alice = app.token_for("alice").await;
    let first = create_post(&app, &alice, "First").await;
    let second = create_post(&app, &alice, "Second").await;

    let parent = comment(&app, &alice, &first, "On first", None).await;
    let response = comment(&app, &alice, &second, "Lost", Some(&parent.str_field("id"))).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);

    let missing = uuid::Uuid::new_v4().to_string();
    let response = comment(&app, &alice, &missing, "Nowhere", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = comment(&app, &alice, &first, "", None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_comment_on_inactive_post_is_hidden() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("bob", UserRole::User).await;
    app.create_user("sam", UserRole::Staff).await;
    let alice = app.token_for("alice").await;
    let bob = app.token_for("bob").await;
    let sam = app.token_for("sam").await;

    let response = app
        .request(
            "POST",
            "/api/posts",
            Some(json!({"name": "draft", "title": "Draft", "text": "Body", "is_active": false})),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let post_id = response.str_field("id");
    let note = comment(&app, &alice, &post_id, "hidden note", None).await;
    assert_eq!(note.status, StatusCode::CREATED);
    let path = format!("/api/comments/{}", note.str_field("id"));

    let response = app.request("GET", &path, None, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let response = app.request("GET", &path, None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    for token in [&alice, &sam] {
        let response = app.request("GET", &path, None, Some(token)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["text"], "hidden note");
    }
}

#[tokio::test]
async fn test_comment_ownership_and_cascade() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("bob", UserRole::User).await;
    let alice = app.token_for("alice").await;
    let bob = app.token_for("bob").await;
    let post_id = create_post(&app, &alice, "Cascade").await;

    let root_id = comment(&app, &bob, &post_id, "Root", None)
        .await
        .str_field("id");
    let reply_id = comment(&app, &alice, &post_id, "Reply", Some(&root_id))
        .await
        .str_field("id");
    let root_path = format!("/api/comments/{root_id}");

    let response = app
        .request("PUT", &root_path, Some(json!({"text": "Hijacked"})), Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("PUT", &root_path, Some(json!({"text": "Edited"})), Some(&bob))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["text"], "Edited");

    let response = app.request("DELETE", &root_path, None, Some(&bob)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    for id in [&root_id, &reply_id] {
        let response = app
            .request("GET", &format!("/api/comments/{id}"), None, None)
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_like_toggle_cycle() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    app.create_user("bob", UserRole::User).await;
    let alice = app.token_for("alice").await;
    let bob = app.token_for("bob").await;
    let post_id = create_post(&app, &alice, "Likes").await;

    let body = toggle(&app, &bob, &post_id, true).await;
    assert_eq!(body, json!({"liked": true, "likes_count": 1, "dislikes_count": 0}));

    let body = toggle(&app, &bob, &post_id, true).await;
    assert_eq!(body, json!({"liked": null, "likes_count": 0, "dislikes_count": 0}));

    let body = toggle(&app, &bob, &post_id, false).await;
    assert_eq!(body, json!({"liked": false, "likes_count": 0, "dislikes_count": 1}));

    let body = toggle(&app, &bob, &post_id, true).await;
    assert_eq!(body, json!({"liked": true, "likes_count": 1, "dislikes_count": 0}));

    toggle(&app, &alice, &post_id, false).await;

    let stats_path = format!("/api/posts/{post_id}/likes");
    let response = app.request("GET", &stats_path, None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        json!({"likes_count": 1, "dislikes_count": 1, "user_liked": null})
    );

    let response = app.request("GET", &stats_path, None, Some(&bob)).await;
    assert_eq!(response.body["user_liked"], true);
}

#[tokio::test]
async fn test_like_toggle_requirements() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let alice = app.token_for("alice").await;
    let post_id = create_post(&app, &alice, "Rules").await;
    let path = format!("/api/posts/{post_id}/likes/toggle");

    let response = app
        .request("POST", &format!("{path}?is_like=true"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app.request("POST", &path, None, Some(&alice)).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_deleting_post_removes_comments() {
    let app = TestApp::new();
    app.create_user("alice", UserRole::User).await;
    let alice = app.token_for("alice").await;
    let post_id = create_post(&app, &alice, "Gone").await;
    let comment_id = comment(&app, &alice, &post_id, "Soon gone", None)
        .await
        .str_field("id");

    let response = app
        .request("DELETE", &format!("/api/posts/{post_id}"), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request("GET", &format!("/api/comments/{comment_id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
