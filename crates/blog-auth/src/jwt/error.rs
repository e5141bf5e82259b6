//! Token failure kinds.

use blog_core::error::AppError;

/// Client-facing message for every rejected token.
pub const UNAUTHENTICATED_MESSAGE: &str = "Could not validate credentials";

/// Why a token was rejected or could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, malformed payload or wrong token type.
    #[error("token is invalid")]
    TokenInvalid,
    /// Signature is valid but the token is past its expiry.
    #[error("token has expired")]
    TokenExpired,
    /// Signing failed.
    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenInvalid | TokenError::TokenExpired => {
                AppError::unauthorized(UNAUTHENTICATED_MESSAGE)
            }
            TokenError::Encoding(msg) => AppError::internal(format!("Token encoding failed: {msg}")),
        }
    }
}
