//! Blog domain model.
//!
//! # Responsibility
//! - Define the stored shape of users, posts and comments.
//! - Define the writable field sets accepted by create/update paths.
//! - Validate field sets before they reach SQL.
//!
//! # Invariants
//! - Identifiers are assigned by the store and never reused.
//! - Timestamps are Unix epoch milliseconds.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment;
pub mod post;
pub mod user;

/// Unix epoch milliseconds as stored in `*_at` columns.
pub type EpochMs = i64;

/// Field-level validation failure raised before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty after trimming.
    BlankField(&'static str),
    /// Email does not look like `local@domain`.
    InvalidEmail(String),
    /// Username contains whitespace.
    InvalidUsername(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::InvalidUsername(value) => {
                write!(f, "username must not contain whitespace: `{value}`")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
