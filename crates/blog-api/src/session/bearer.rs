//! Header-only transport.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use blog_core::config::TransportMode;

use super::{ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER, SessionTransport, bearer_token};

/// Tokens are returned in response headers and sent back as
/// `Authorization: Bearer`. Nothing is stored client-side by the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerTransport;

impl BearerTransport {
    /// Creates a new bearer transport.
    pub fn new() -> Self {
        Self
    }
}

fn set_header(headers: &mut HeaderMap, name: &'static str, token: &str) {
    match HeaderValue::from_str(token) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(name), value);
        }
        Err(e) => tracing::warn!(header = name, error = %e, "Token is not a valid header value"),
    }
}

impl SessionTransport for BearerTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Bearer
    }

    fn attach(&self, headers: &mut HeaderMap, access_token: &str, refresh_token: Option<&str>) {
        set_header(headers, ACCESS_TOKEN_HEADER, access_token);
        if let Some(refresh_token) = refresh_token {
            set_header(headers, REFRESH_TOKEN_HEADER, refresh_token);
        }
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        bearer_token(headers)
    }

    fn extract_refresh(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }

    fn clear(&self, _headers: &mut HeaderMap) {}
}
