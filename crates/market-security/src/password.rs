//! Password hashing with Argon2
//!
//! New credentials are always hashed with Argon2id. Accounts imported from
//! the previous deployment still carry bcrypt hashes (`$2a$`, `$2b$`, `$2y$`),
//! which are verified but never produced.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use market_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use std::sync::LazyLock;
use thiserror::Error;

/// Minimum zxcvbn score (0..=4) accepted for new credentials.
pub const MIN_PASSWORD_SCORE: u8 = 2;

// Hash verified when the account does not exist.
static DECOY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| PasswordService::hash("decoy-credential-never-issued").ok());

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Password must be between {} and {} characters", MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)]
    InvalidLength,
    #[error("Password too weak")]
    TooWeak,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if is_bcrypt_hash(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::HashError(e.to_string()));
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Spends one full Argon2 verification on a fixed hash and reports no
    /// match. Login calls this for unknown usernames so that a missing account
    /// costs as much as a wrong credential.
    pub fn verify_decoy(password: &str) -> bool {
        if let Some(hash) = DECOY_HASH.as_deref() {
            let _ = Self::verify(password, hash);
        }
        false
    }

    /// Length bounds plus a zxcvbn estimate. `user_inputs` (username, email)
    /// penalise passwords derived from the account's own identifiers.
    pub fn check_strength(password: &str, user_inputs: &[&str]) -> Result<(), PasswordError> {
        let len = password.chars().count();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
            return Err(PasswordError::InvalidLength);
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if u8::from(estimate.score()) < MIN_PASSWORD_SCORE {
            return Err(PasswordError::TooWeak);
        }
        Ok(())
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"].iter().any(|p| hash.starts_with(p))
}
