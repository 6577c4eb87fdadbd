//! User account model.
//!
//! # Invariants
//! - `email` and `username` are unique across all users (store-enforced).
//! - `password_hash` is an Argon2 PHC string, never a plaintext password.

use super::{require_non_blank, EpochMs, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("valid email regex"));

pub type UserId = i64;

/// Stored user row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub username: String,
    /// Never serialized; only the auth path reads it.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Columns written by user insert/update statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

impl UserFields {
    /// Builds a field set with surrounding whitespace trimmed.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into().trim().to_string(),
            email: email.into().trim().to_string(),
            username: username.into().trim().to_string(),
            password_hash: password_hash.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("name", &self.name)?;
        require_non_blank("email", &self.email)?;
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        require_non_blank("username", &self.username)?;
        if self.username.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidUsername(self.username.clone()));
        }
        require_non_blank("password_hash", &self.password_hash)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{User, UserFields};
    use crate::model::ValidationError;

    #[test]
    fn new_trims_identity_fields() {
        let fields = UserFields::new("  Alice ", " a@x.com ", " alice ", "hash");
        assert_eq!(fields.name, "Alice");
        assert_eq!(fields.email, "a@x.com");
        assert_eq!(fields.username, "alice");
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_email_and_spaced_username() {
        let bad_email = UserFields::new("Alice", "alice.at.x.com", "alice", "hash");
        assert!(matches!(
            bad_email.validate(),
            Err(ValidationError::InvalidEmail(_))
        ));

        let bad_username = UserFields::new("Alice", "a@x.com", "al ice", "hash");
        assert!(matches!(
            bad_username.validate(),
            Err(ValidationError::InvalidUsername(_))
        ));
    }

    #[test]
    fn serialized_user_omits_password_hash() {
        let user = User {
            id: 1,
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }
}
