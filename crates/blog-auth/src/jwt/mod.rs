//! JWT issuing and verification.

pub mod claims;
pub mod error;
pub mod service;

pub use claims::{Claims, TokenType};
pub use error::TokenError;
pub use service::{IssuedToken, TokenPair, TokenService, TokenSubject};
