//! Registration, login, refresh and token authentication.

pub mod service;

pub use service::{AuthService, Registration, RefreshedAccess, Session};
