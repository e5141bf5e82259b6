//! # blog-service
//!
//! Business logic for the blog backend. Each service owns the repositories
//! it needs (as trait objects) plus the [`blog_auth::AuthorizationGate`], and
//! every privileged operation consults the gate before touching storage.

pub mod auth;
pub mod comment;
pub mod context;
pub mod like;
pub mod post;
pub mod user;

pub use auth::{AuthService, Registration};
pub use comment::CommentService;
pub use context::RequestContext;
pub use like::LikeService;
pub use post::{NewPost, PostService};
pub use user::UserService;

#[cfg(test)]
pub(crate) mod testing;
