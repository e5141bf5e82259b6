//! HttpOnly cookie transport.

use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use blog_core::config::{AuthConfig, CookieConfig, SameSitePolicy, TransportMode};

use super::{SessionTransport, bearer_token};

/// Tokens live in two HttpOnly cookies. The refresh cookie is scoped to the
/// auth endpoints so it is only sent where it can be used.
///
/// An `Authorization: Bearer` header still takes precedence when present.
#[derive(Debug, Clone)]
pub struct CookieTransport {
    config: CookieConfig,
    access_max_age: time::Duration,
    refresh_max_age: time::Duration,
}

impl CookieTransport {
    /// Creates a cookie transport from auth settings.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            config: config.cookie.clone(),
            access_max_age: time::Duration::seconds(config.access_ttl_seconds()),
            refresh_max_age: time::Duration::seconds(config.refresh_ttl_seconds()),
        }
    }

    fn same_site(&self) -> SameSite {
        match self.config.same_site {
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::None => SameSite::None,
        }
    }

    fn build_cookie(
        &self,
        name: &str,
        value: &str,
        path: &str,
        max_age: time::Duration,
    ) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_string(), value.to_string()))
            .http_only(true)
            .secure(self.config.secure)
            .same_site(self.same_site())
            .path(path.to_string())
            .max_age(max_age);
        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }

    fn removal_cookie(&self, name: &str, path: &str) -> Cookie<'static> {
        let mut cookie = self.build_cookie(name, "", path, time::Duration::ZERO);
        cookie.make_removal();
        cookie
    }

    fn read(&self, headers: &HeaderMap, name: &str) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

fn append_cookie(headers: &mut HeaderMap, cookie: &Cookie<'static>) {
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            headers.append(header::SET_COOKIE, value);
        }
        Err(e) => tracing::warn!(cookie = cookie.name(), error = %e, "Cookie is not a valid header value"),
    }
}

impl SessionTransport for CookieTransport {
    fn mode(&self) -> TransportMode {
        TransportMode::Cookie
    }

    fn attach(&self, headers: &mut HeaderMap, access_token: &str, refresh_token: Option<&str>) {
        let access = self.build_cookie(
            &self.config.access_cookie_name,
            access_token,
            &self.config.access_cookie_path,
            self.access_max_age,
        );
        append_cookie(headers, &access);

        if let Some(refresh_token) = refresh_token {
            let refresh = self.build_cookie(
                &self.config.refresh_cookie_name,
                refresh_token,
                &self.config.refresh_cookie_path,
                self.refresh_max_age,
            );
            append_cookie(headers, &refresh);
        }
    }

    fn extract(&self, headers: &HeaderMap) -> Option<String> {
        bearer_token(headers).or_else(|| self.read(headers, &self.config.access_cookie_name))
    }

    fn extract_refresh(&self, headers: &HeaderMap) -> Option<String> {
        self.read(headers, &self.config.refresh_cookie_name)
    }

    fn clear(&self, headers: &mut HeaderMap) {
        let access =
            self.removal_cookie(&self.config.access_cookie_name, &self.config.access_cookie_path);
        let refresh =
            self.removal_cookie(&self.config.refresh_cookie_name, &self.config.refresh_cookie_path);
        append_cookie(headers, &access);
        append_cookie(headers, &refresh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_attach_sets_both_cookies() {
        let transport = CookieTransport::new(&AuthConfig::default());
        let mut headers = HeaderMap::new();
        transport.attach(&mut headers, "acc", Some("ref"));

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 2);

        let access = &cookies[0];
        assert!(access.starts_with("access_token=acc"));
        assert!(access.contains("HttpOnly"));
        assert!(access.contains("SameSite=Lax"));
        assert!(access.contains("Path=/"));
        assert!(access.contains("Max-Age=1800"));
        assert!(!access.contains("Secure"));

        let refresh = &cookies[1];
        assert!(refresh.starts_with("refresh_token=ref"));
        assert!(refresh.contains("Path=/api/auth"));
        assert!(refresh.contains("Max-Age=604800"));
    }

    #[test]
    fn test_secure_and_domain_from_config() {
        let mut config = AuthConfig::default();
        config.cookie.secure = true;
        config.cookie.same_site = SameSitePolicy::Strict;
        config.cookie.domain = Some("blog.example.com".to_string());
        let transport = CookieTransport::new(&config);

        let mut headers = HeaderMap::new();
        transport.attach(&mut headers, "acc", None);

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].contains("Secure"));
        assert!(cookies[0].contains("SameSite=Strict"));
        assert!(cookies[0].contains("Domain=blog.example.com"));
    }

    #[test]
    fn test_extract_prefers_authorization_header() {
        let transport = CookieTransport::new(&AuthConfig::default());
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("access_token=from-cookie; refresh_token=r"),
        );
        assert_eq!(transport.extract(&headers).as_deref(), Some("from-cookie"));
        assert_eq!(transport.extract_refresh(&headers).as_deref(), Some("r"));

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(transport.extract(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_empty_cookie_is_anonymous() {
        let transport = CookieTransport::new(&AuthConfig::default());
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token="));
        assert_eq!(transport.extract(&headers), None);
    }

    #[test]
    fn test_clear_expires_both_cookies() {
        let transport = CookieTransport::new(&AuthConfig::default());
        let mut headers = HeaderMap::new();
        transport.clear(&mut headers);

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("access_token=;"));
        assert!(cookies[1].starts_with("refresh_token=;"));
        for cookie in &cookies {
            assert!(cookie.contains("Max-Age=0"));
        }
        assert!(cookies[1].contains("Path=/api/auth"));
    }
}
