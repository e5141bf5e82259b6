//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use std::sync::LazyLock;

use blog_core::error::AppError;

/// Hash checked when the account does not exist, so unknown usernames cost the
/// same Argon2 work as wrong passwords.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| PasswordHasher.hash_password("unused-placeholder-password").ok());

/// Hashes and verifies passwords with Argon2id and a random salt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a hasher with default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password into a PHC string.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }

    /// Check `password` against a stored PHC hash.
    ///
    /// A wrong password is `Ok(false)`; an unparseable hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    /// Run a full verification against a throwaway hash. Always `false`.
    pub fn verify_dummy(&self, password: &str) -> bool {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = self.verify_password(password, hash);
        }
        false
    }
}
