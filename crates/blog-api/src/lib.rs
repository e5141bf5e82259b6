//! # blog-api
//!
//! HTTP API layer for the blog backend built on Axum.
//!
//! Provides the REST endpoints, middleware (CORS, request id, access log),
//! the cookie/bearer session transport, extractors, DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
