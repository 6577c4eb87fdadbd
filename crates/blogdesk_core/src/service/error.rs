//! Service-level error taxonomy shared by all entity services.

use crate::auth::PasswordHashError;
use crate::model::post::PostId;
use crate::model::user::UserId;
use crate::model::ValidationError;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by entity services.
#[derive(Debug)]
pub enum ServiceError {
    /// Input fields failed validation.
    Validation(ValidationError),
    /// Target row does not exist.
    NotFound { entity: &'static str, key: String },
    /// Another user already registered this email.
    EmailTaken(String),
    /// Another user already registered this username.
    UsernameTaken(String),
    /// A post with this title already exists.
    TitleTaken(String),
    /// The user already commented on this post.
    CommentExists { user_id: UserId, post_id: PostId },
    /// Comment target post does not exist.
    PostNotFound(PostId),
    /// Unknown username or wrong password.
    InvalidCredentials,
    /// Session user does not own the target row.
    NotOwner { entity: &'static str, id: i64 },
    PasswordHash(PasswordHashError),
    /// Any other storage failure, including `UpdateFailed`/`DeleteFailed`.
    Repo(RepoError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::PostNotFound(_))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::EmailTaken(email) => write!(f, "user with email `{email}` already exists"),
            Self::UsernameTaken(username) => {
                write!(f, "user with username `{username}` already exists")
            }
            Self::TitleTaken(title) => write!(f, "a post titled `{title}` already exists"),
            Self::CommentExists { user_id, post_id } => write!(
                f,
                "user {user_id} already commented on post {post_id}"
            ),
            Self::PostNotFound(id) => write!(f, "post not found: id={id}"),
            Self::InvalidCredentials => write!(f, "username or password is incorrect"),
            Self::NotOwner { entity, id } => {
                write!(f, "{entity} {id} belongs to another user")
            }
            Self::PasswordHash(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::PasswordHash(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PasswordHashError> for ServiceError {
    fn from(value: PasswordHashError) -> Self {
        Self::PasswordHash(value)
    }
}
