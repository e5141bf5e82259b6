//! Application builder: wires services, router and middleware into an Axum app.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use blog_auth::{Clock, PasswordValidator, SystemClock, TokenService};
use blog_core::config::AppConfig;
use blog_core::error::{AppError, ErrorKind};
use blog_core::result::AppResult;
use blog_database::Store;
use blog_service::{AuthService, CommentService, LikeService, PostService, UserService};

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::request_id::{propagate_request_id_layer, set_request_id_layer};
use crate::router::build_router;
use crate::session::build_transport;
use crate::state::AppState;

/// Wires services over `store`, reading time from `clock`.
pub fn build_state(config: AppConfig, store: Store, clock: Arc<dyn Clock>) -> AppResult<AppState> {
    let tokens = Arc::new(TokenService::with_clock(&config.auth, clock)?);
    let validator = Arc::new(PasswordValidator::new(&config.auth));
    let transport = build_transport(&config.auth);

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&store.users),
        tokens,
        Arc::clone(&validator),
    ));
    let user_service = Arc::new(UserService::new(Arc::clone(&store.users), validator));
    let post_service = Arc::new(PostService::new(Arc::clone(&store.posts)));
    let comment_service = Arc::new(CommentService::new(
        Arc::clone(&store.comments),
        Arc::clone(&store.posts),
    ));
    let like_service = Arc::new(LikeService::new(
        Arc::clone(&store.likes),
        Arc::clone(&store.posts),
    ));

    Ok(AppState {
        config: Arc::new(config),
        store,
        transport,
        auth_service,
        user_service,
        post_service,
        comment_service,
        like_service,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(axum::middleware::from_fn(request_logging))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer())
                .layer(cors),
        )
}

/// Runs the blog server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting blog server v{}", env!("CARGO_PKG_VERSION"));

    let store = Store::connect(&config.database).await?;
    tracing::info!(provider = store.provider_name(), "Store ready");

    let state = build_state(config, store, Arc::new(SystemClock))?;

    if let Some(admin) = state
        .auth_service
        .bootstrap_superuser(&state.config.admin)
        .await?
    {
        tracing::info!(username = %admin.username, "Superuser bootstrapped");
    }

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        AppError::with_source(ErrorKind::Internal, format!("Failed to bind {addr}"), e)
    })?;
    tracing::info!("Blog server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Server error", e))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C; shutting down");
    }
    tracing::info!("Shutdown signal received");
}
