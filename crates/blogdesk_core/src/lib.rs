//! Core data access and business rules for blogdesk.
//! Every user/post/comment invariant lives in this crate; the shell only
//! collects input and renders results.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{hash_password, verify_password, PasswordHashError, Session};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::comment::{Comment, CommentDraft, CommentId};
pub use model::post::{Post, PostDraft, PostId};
pub use model::user::{User, UserFields, UserId};
pub use model::{EpochMs, ValidationError};
pub use repo::comment_repo::{CommentRepository, SqliteCommentRepository};
pub use repo::error::{RepoError, RepoResult};
pub use repo::post_repo::{PostRepository, SqlitePostRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::comment_service::CommentService;
pub use service::error::{ServiceError, ServiceResult};
pub use service::post_service::PostService;
pub use service::user_service::{SignupRequest, UserService, UserUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
