//! Password hashing.
//!
//! argon2id with the crate's default parameters. Both operations are CPU
//! bound and run on the blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use finbook_core::finance::PasswordHash;

use crate::error::AuthError;

/// Hashes `password` into a PHC string.
pub async fn hash_password(password: String) -> Result<PasswordHash, AuthError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|e| AuthError::Password(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Password(format!("hashing task failed: {e}")))?
}

/// Returns true if `password` matches `hash`.
///
/// A malformed stored hash is an error, not a mismatch.
pub async fn verify_password(password: String, hash: PasswordHash) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || {
        let parsed = argon2::PasswordHash::new(hash.as_str())
            .map_err(|e| AuthError::Password(format!("stored hash is malformed: {e}")))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Password(e.to_string())),
        }
    })
    .await
    .map_err(|e| AuthError::Password(format!("verification task failed: {e}")))?
}
