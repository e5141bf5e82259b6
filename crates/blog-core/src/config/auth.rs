//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Minimum accepted length of the signing secret.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted access token lifetime (one day).
const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;
/// Longest accepted refresh token lifetime.
const MAX_REFRESH_TTL_DAYS: u64 = 365;
/// Largest accepted clock skew tolerance.
const MAX_LEEWAY_SECONDS: u64 = 300;

/// Signing algorithms accepted for the HMAC secret.
const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// Token lifetimes, signing, password policy and session transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing. Required, at least 32 characters.
    #[serde(default)]
    pub jwt_secret: String,
    /// HMAC algorithm name (`HS256`, `HS384` or `HS512`).
    #[serde(default = "default_algorithm")]
    pub jwt_algorithm: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_minutes: u64,
    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_days: u64,
    /// Clock skew tolerated past `exp`, in seconds.
    #[serde(default)]
    pub leeway_seconds: u64,
    /// Minimum password length for new passwords.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// How tokens travel between client and server.
    #[serde(default)]
    pub transport: TransportMode,
    /// Cookie settings, used when `transport = "cookie"`.
    #[serde(default)]
    pub cookie: CookieConfig,
}

/// Session transport strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// HttpOnly cookie pair, with `Authorization: Bearer` still honoured.
    #[default]
    Cookie,
    /// `Authorization: Bearer` header only.
    Bearer,
}

/// SameSite policy applied to session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    /// `SameSite=Lax`.
    #[default]
    Lax,
    /// `SameSite=Strict`.
    Strict,
    /// `SameSite=None` (requires `secure`).
    None,
}

/// Cookie carrier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Mark cookies `Secure` (HTTPS-only deployments).
    #[serde(default)]
    pub secure: bool,
    /// SameSite policy.
    #[serde(default)]
    pub same_site: SameSitePolicy,
    /// Optional cookie domain.
    #[serde(default)]
    pub domain: Option<String>,
    /// Name of the access token cookie.
    #[serde(default = "default_access_cookie")]
    pub access_cookie_name: String,
    /// Name of the refresh token cookie.
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie_name: String,
    /// Path scope of the access token cookie.
    #[serde(default = "default_access_path")]
    pub access_cookie_path: String,
    /// Path scope of the refresh token cookie (the auth endpoints).
    #[serde(default = "default_refresh_path")]
    pub refresh_cookie_path: String,
}

impl AuthConfig {
    /// Access token lifetime in seconds.
    pub fn access_ttl_seconds(&self) -> i64 {
        (self.access_token_ttl_minutes * 60) as i64
    }

    /// Refresh token lifetime in seconds.
    pub fn refresh_ttl_seconds(&self) -> i64 {
        (self.refresh_token_ttl_days * 24 * 60 * 60) as i64
    }

    /// Reject secrets, algorithms and lifetimes the token service cannot use.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must be set"));
        }
        if self.jwt_secret.chars().count() < MIN_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_LENGTH} characters long"
            )));
        }
        if !SUPPORTED_ALGORITHMS.contains(&self.jwt_algorithm.as_str()) {
            return Err(AppError::configuration(format!(
                "Unsupported auth.jwt_algorithm '{}'. Supported: {}",
                self.jwt_algorithm,
                SUPPORTED_ALGORITHMS.join(", ")
            )));
        }
        if self.access_token_ttl_minutes == 0 || self.refresh_token_ttl_days == 0 {
            return Err(AppError::configuration(
                "Token lifetimes must be greater than zero",
            ));
        }
        if self.access_token_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.access_token_ttl_minutes must not exceed {MAX_ACCESS_TTL_MINUTES}"
            )));
        }
        if self.refresh_token_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.refresh_token_ttl_days must not exceed {MAX_REFRESH_TTL_DAYS}"
            )));
        }
        if self.leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(AppError::configuration(format!(
                "auth.leeway_seconds must not exceed {MAX_LEEWAY_SECONDS}"
            )));
        }
        if self.cookie.same_site == SameSitePolicy::None && !self.cookie.secure {
            return Err(AppError::configuration(
                "auth.cookie.same_site = \"none\" requires auth.cookie.secure = true",
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_algorithm: default_algorithm(),
            access_token_ttl_minutes: default_access_ttl(),
            refresh_token_ttl_days: default_refresh_ttl(),
            leeway_seconds: 0,
            password_min_length: default_password_min(),
            transport: TransportMode::default(),
            cookie: CookieConfig::default(),
        }
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            same_site: SameSitePolicy::default(),
            domain: None,
            access_cookie_name: default_access_cookie(),
            refresh_cookie_name: default_refresh_cookie(),
            access_cookie_path: default_access_path(),
            refresh_cookie_path: default_refresh_path(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_password_min() -> usize {
    8
}

fn default_access_cookie() -> String {
    "access_token".to_string()
}

fn default_refresh_cookie() -> String {
    "refresh_token".to_string()
}

fn default_access_path() -> String {
    "/".to_string()
}

fn default_refresh_path() -> String {
    "/api/auth".to_string()
}
