//! Route table.

use axum::Router;
use axum::routing::{get, post, put};

use crate::handlers;
use crate::state::AppState;

/// All `/api` routes with state applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/posts", post_routes())
        .nest("/comments", comment_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/login-form", post(handlers::auth::login))
        .route("/login-json", post(handlers::auth::login_json))
        .route("/refresh", post(handlers::auth::refresh))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::user::list_users))
        .route("/me/password", put(handlers::user::change_password))
        .route(
            "/{id}",
            get(handlers::user::get_user).patch(handlers::user::update_user),
        )
        .route("/{id}/role", put(handlers::user::change_role))
        .route("/{id}/status", put(handlers::user::change_status))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::post::list_posts).post(handlers::post::create_post),
        )
        .route("/all", get(handlers::post::list_all_posts))
        .route(
            "/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
        .route(
            "/{id}/comments",
            get(handlers::comment::list_comments).post(handlers::comment::create_comment),
        )
        .route("/{id}/likes", get(handlers::like::like_stats))
        .route("/{id}/likes/toggle", post(handlers::like::toggle_like))
}

fn comment_routes() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(handlers::comment::get_comment)
            .put(handlers::comment::update_comment)
            .delete(handlers::comment::delete_comment),
    )
}
