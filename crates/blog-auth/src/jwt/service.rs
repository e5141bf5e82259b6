//! Token issuing, verification and refresh.
//!
//! Tokens are HMAC-signed JWTs. Expiry is checked against an injected
//! [`Clock`] after the signature has been verified, so a tampered token is
//! always reported as invalid, never as expired.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use blog_core::config::AuthConfig;
use blog_core::error::AppError;
use blog_entity::user::{User, UserRole};

use super::claims::{Claims, TokenType};
use super::error::TokenError;
use crate::clock::{Clock, SystemClock};

/// The identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    /// User ID.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Role.
    pub role: UserRole,
}

impl From<&User> for TokenSubject {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// Access + refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
}

/// A single freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded JWT.
    pub token: String,
    /// Claims that were signed.
    pub claims: Claims,
}

/// Issues and verifies tokens with one immutable signing configuration.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
    leeway_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

impl TokenService {
    /// Create a service on the system clock.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service reading time from `clock`.
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        config.validate()?;
        let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|e| {
            AppError::configuration(format!(
                "Unsupported auth.jwt_algorithm '{}': {e}",
                config.jwt_algorithm
            ))
        })?;

        let mut validation = Validation::new(algorithm);
        // Expiry is enforced against `clock` in `decode_checked`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            algorithm,
            validation,
            access_ttl: Duration::seconds(config.access_ttl_seconds()),
            refresh_ttl: Duration::seconds(config.refresh_ttl_seconds()),
            leeway_seconds: config.leeway_seconds as i64,
            clock,
        })
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Refresh token lifetime.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issue an access + refresh pair for `subject`.
    pub fn issue(&self, subject: &TokenSubject) -> Result<TokenPair, TokenError> {
        let now = self.clock.now();
        let access = self.sign(subject, TokenType::Access, now)?;
        let refresh = self.sign(subject, TokenType::Refresh, now)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: now + self.access_ttl,
            refresh_expires_at: now + self.refresh_ttl,
        })
    }

    /// Issue a standalone access token.
    pub fn issue_access(&self, subject: &TokenSubject) -> Result<IssuedToken, TokenError> {
        self.sign(subject, TokenType::Access, self.clock.now())
    }

    /// Verify an access token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_checked(token, TokenType::Access)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_checked(token, TokenType::Refresh)
    }

    /// Mint a new access token from a valid refresh token.
    ///
    /// The new token carries the subject, username and role of the refresh
    /// token. The refresh token itself is neither rotated nor invalidated.
    pub fn refresh(&self, refresh_token: &str) -> Result<(Claims, IssuedToken), TokenError> {
        let claims = self.verify_refresh(refresh_token)?;
        let subject = TokenSubject {
            id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
        };
        let access = self.issue_access(&subject)?;
        Ok((claims, access))
    }

    fn sign(
        &self,
        subject: &TokenSubject,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: subject.id,
            username: subject.username.clone(),
            role: subject.role,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4(),
            token_type,
        };

        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        Ok(IssuedToken { token, claims })
    }

    fn decode_checked(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Token failed signature or format check");
                TokenError::TokenInvalid
            })?
            .claims;

        if self.clock.now().timestamp() >= claims.exp + self.leeway_seconds {
            return Err(TokenError::TokenExpired);
        }

        if claims.token_type != expected {
            debug!(
                expected = ?expected,
                actual = ?claims.token_type,
                "Token has the wrong type"
            );
            return Err(TokenError::TokenInvalid);
        }

        Ok(claims)
    }
}
