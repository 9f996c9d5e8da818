//! Password hashing and verification using Argon2id.
//!
//! New accounts store a PHC-format string (`$argon2id$v=19$...`) in the
//! user document's `password` field. Accounts written by the legacy client
//! hold the plaintext password instead; [`verify_password`] still accepts
//! those so existing users can log in.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{Error, Result};

const PHC_PREFIX: &str = "$argon2";

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|error| Error::PasswordHash(format!("failed to hash password: {error}")))?;
    Ok(hash.to_string())
}

/// Whether a stored value is an Argon2 PHC hash rather than legacy plaintext
pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with(PHC_PREFIX)
}

/// Check `password` against the stored `password` field value.
///
/// Values that do not parse as a PHC hash, including legacy plaintext that
/// happens to start with `$argon2`, are compared directly.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parsed = if is_password_hash(stored) {
        PasswordHash::new(stored).ok()
    } else {
        None
    };
    let Some(parsed) = parsed else {
        tracing::warn!("User document stores a plaintext password; comparing directly");
        return password == stored;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
