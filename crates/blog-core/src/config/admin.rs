//! Superuser bootstrap configuration.

use serde::{Deserialize, Serialize};

/// Credentials for the superuser created at startup when none exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Create the superuser on startup if the username is free.
    #[serde(default)]
    pub bootstrap: bool,
    /// Superuser username.
    #[serde(default = "default_username")]
    pub username: String,
    /// Superuser email.
    #[serde(default = "default_email")]
    pub email: String,
    /// Superuser password. Required when `bootstrap` is enabled.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bootstrap: false,
            username: default_username(),
            email: default_email(),
            password: None,
        }
    }
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_email() -> String {
    "admin@example.com".to_string()
}
