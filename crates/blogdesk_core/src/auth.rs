//! Password hashing and authenticated session context.
//!
//! # Responsibility
//! - Hash signup passwords with Argon2id into PHC strings.
//! - Verify login attempts against stored hashes.
//! - Carry the authenticated actor explicitly through service calls.
//!
//! # Invariants
//! - Plaintext passwords are never stored or logged.
//! - Each hash carries its own random salt.

use crate::model::user::{User, UserId};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure inside the hashing backend (not a wrong password).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashError(String);

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for PasswordHashError {}

/// Hashes `password` with Argon2id and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError(err.to_string()))
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` on mismatch; errors only for malformed hashes.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|err| PasswordHashError(format!("invalid stored hash: {err}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(PasswordHashError(err.to_string())),
    }
}

/// Authenticated actor for post/comment operations.
///
/// Only `UserService::authenticate` hands these out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
    username: String,
}

impl Session {
    pub(crate) fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}
