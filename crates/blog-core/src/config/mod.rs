//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files and
//! environment variables via the `config` crate. Each sub-module
//! represents a logical configuration section.

pub mod admin;
pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::admin::AdminConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{AuthConfig, CookieConfig, SameSitePolicy, TransportMode};
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration sources
/// (`config/default.toml`, the environment overlay, then `BLOG__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token, password and session transport settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Superuser bootstrap settings.
    #[serde(default)]
    pub admin: AdminConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files and the environment.
    ///
    /// Merges `config/default.toml` with `config/{env}.toml` and environment
    /// variables prefixed with `BLOG` (`BLOG_AUTH__JWT_SECRET`, ...), then
    /// validates the result.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BLOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;
        self.database.validate()?;
        if self.admin.bootstrap && self.admin.password.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::configuration(
                "admin.password must be set when admin.bootstrap is enabled",
            ));
        }
        Ok(())
    }
}
