//! CORS layer configuration.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use blog_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// Credentials are only allowed with an explicit origin list; a `*` origin
/// turns them off.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let wildcard = |values: &[String]| values.iter().any(|v| v == "*");
    let mut layer = CorsLayer::new();

    let any_origin = wildcard(&config.allowed_origins);
    let credentials = config.allow_credentials && !any_origin;

    if any_origin {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if wildcard(&config.allowed_headers) && !credentials {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter(|h| h.as_str() != "*")
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }

    let exposed: Vec<HeaderName> = config
        .expose_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    layer
        .expose_headers(exposed)
        .allow_credentials(credentials)
        .max_age(std::time::Duration::from_secs(config.max_age_seconds))
}
