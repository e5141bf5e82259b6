//! How tokens travel between client and server.
//!
//! A [`SessionTransport`] attaches freshly issued tokens to a response,
//! reads them back from requests and clears them on logout. The strategy is
//! picked once from `auth.transport`.

pub mod bearer;
pub mod cookie;

use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};

use blog_core::config::{AuthConfig, TransportMode};

pub use bearer::BearerTransport;
pub use cookie::CookieTransport;

/// Response header carrying a new access token in bearer mode.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";
/// Request/response header carrying the refresh token in bearer mode.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// Carrier strategy for access and refresh tokens.
pub trait SessionTransport: Send + Sync + fmt::Debug + 'static {
    /// Which mode this transport implements.
    fn mode(&self) -> TransportMode;

    /// Attach tokens to outgoing response headers.
    ///
    /// `refresh_token` is `None` when only the access token was reissued.
    fn attach(&self, headers: &mut HeaderMap, access_token: &str, refresh_token: Option<&str>);

    /// Read the access token from a request, if any.
    fn extract(&self, headers: &HeaderMap) -> Option<String>;

    /// Read the refresh token from a request, if any.
    fn extract_refresh(&self, headers: &HeaderMap) -> Option<String>;

    /// Remove the client-side carriers.
    fn clear(&self, headers: &mut HeaderMap);
}

/// Select the transport configured in `auth.transport`.
pub fn build_transport(config: &AuthConfig) -> Arc<dyn SessionTransport> {
    match config.transport {
        TransportMode::Cookie => Arc::new(CookieTransport::new(config)),
        TransportMode::Bearer => Arc::new(BearerTransport::new()),
    }
}

/// Token from an `Authorization: Bearer` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .filter(|token| !token.is_empty())
}
