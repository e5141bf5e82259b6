//! # blog-auth
//!
//! Authentication and authorization primitives for the blog backend.
//!
//! ## Modules
//!
//! - `clock` — injectable time source used for token issue and expiry
//! - `jwt` — access/refresh token issuing, verification and refresh
//! - `rbac` — role and ownership checks over any [`Principal`]
//! - `password` — Argon2id hashing and password policy

pub mod clock;
pub mod jwt;
pub mod password;
pub mod rbac;

pub use clock::{Clock, ManualClock, SystemClock};
pub use jwt::{Claims, TokenError, TokenPair, TokenService, TokenSubject, TokenType};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{AuthorizationGate, Decision, Principal};
