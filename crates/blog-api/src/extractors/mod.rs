//! Custom Axum extractors.

pub mod auth;
pub mod pagination;
pub mod path;
pub mod validated;

pub use auth::{AuthUser, Authorized, MaybeAuthUser, StaffOnly, SuperuserOnly};
pub use pagination::{Pagination, PaginationParams};
pub use path::IdPath;
pub use validated::{ValidatedForm, ValidatedJson, ValidatedQuery};
