//! Repository traits and their PostgreSQL implementations.
//!
//! Each trait is implemented twice: by the `Pg*Repository` structs in this
//! module tree and by [`crate::memory::MemoryStore`].

pub mod comment;
pub mod like;
pub mod post;
pub mod user;

pub use comment::{CommentRepository, PgCommentRepository};
pub use like::{LikeRepository, PgLikeRepository};
pub use post::{PgPostRepository, PostRepository};
pub use user::{PgUserRepository, UserRepository};

use blog_core::error::{AppError, ErrorKind};

/// Name of the violated constraint, if `e` is a constraint violation.
pub(crate) fn violated_constraint(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Wrap an sqlx error as a [`ErrorKind::Database`] error.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
