//! Password policy for new passwords.

use blog_core::config::AuthConfig;
use blog_core::error::AppError;

/// Characters accepted as "special".
const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Enforces minimum length and character-class rules.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    min_length: usize,
}

impl PasswordValidator {
    /// Create a validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Check a password, reporting the first violated rule.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AppError::validation(
                "Password must contain at least one uppercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(AppError::validation(
                "Password must contain at least one lowercase letter",
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AppError::validation(
                "Password must contain at least one digit",
            ));
        }

        if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
            return Err(AppError::validation(
                "Password must contain at least one special character",
            ));
        }

        Ok(())
    }

    /// Reject a new password equal to the current one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}
