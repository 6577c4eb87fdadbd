//! Repository error taxonomy and SQLite failure translation.
//!
//! # Invariants
//! - Unique/primary-key violations always surface as `DuplicateKey`.
//! - Foreign-key violations always surface as `InvalidReference`.
//! - Everything else from SQLite passes through as `Db`.

use crate::db::DbError;
use crate::model::ValidationError;
use rusqlite::{ffi, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

const UNIQUE_FAILED_PREFIX: &str = "UNIQUE constraint failed: ";

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// Field set rejected before reaching SQL.
    Validation(ValidationError),
    Db(DbError),
    /// No row matches the requested id or secondary key.
    NotFound { entity: &'static str, key: String },
    /// A unique constraint rejected the write.
    ///
    /// `constraint` lists the violated columns, e.g. `users.email` or
    /// `comments.user_id, comments.post_id`.
    DuplicateKey { constraint: String },
    /// A foreign key points at a row that does not exist.
    InvalidReference(String),
    /// Update statement ran but matched zero rows.
    UpdateFailed { entity: &'static str, id: i64 },
    /// Delete statement ran but matched zero rows.
    DeleteFailed { entity: &'static str, id: i64 },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted row cannot be mapped to the domain model.
    InvalidData(String),
}

impl RepoError {
    pub(crate) fn not_found(entity: &'static str, key: impl Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Returns true when this is a unique violation on exactly `columns`.
    pub fn is_duplicate_of(&self, columns: &str) -> bool {
        matches!(self, Self::DuplicateKey { constraint } if constraint == columns)
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::DuplicateKey { constraint } => {
                write!(f, "record already exists ({constraint})")
            }
            Self::InvalidReference(message) => write!(f, "invalid reference: {message}"),
            Self::UpdateFailed { entity, id } => {
                write!(f, "update failed: no {entity} row with id {id}")
            }
            Self::DeleteFailed { entity, id } => {
                write!(f, "delete failed: no {entity} row with id {id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps a failed insert/update into the typed constraint outcome.
pub(crate) fn map_write_error(err: rusqlite::Error) -> RepoError {
    constraint_error(&err).unwrap_or_else(|| err.into())
}

fn constraint_error(err: &rusqlite::Error) -> Option<RepoError> {
    let rusqlite::Error::SqliteFailure(inner, message) = err else {
        return None;
    };
    if inner.code != ErrorCode::ConstraintViolation {
        return None;
    }

    match inner.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            let constraint = message
                .as_deref()
                .map(|text| {
                    text.strip_prefix(UNIQUE_FAILED_PREFIX)
                        .unwrap_or(text)
                        .to_string()
                })
                .unwrap_or_else(|| "unknown".to_string());
            Some(RepoError::DuplicateKey { constraint })
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(RepoError::InvalidReference(
            message
                .clone()
                .unwrap_or_else(|| "FOREIGN KEY constraint failed".to_string()),
        )),
        _ => None,
    }
}
