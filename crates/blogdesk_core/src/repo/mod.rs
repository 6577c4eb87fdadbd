//! Storage gateway: repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Issue exactly one SQL statement per logical operation.
//! - Return semantic errors (`NotFound`, `DuplicateKey`, `UpdateFailed`,
//!   `DeleteFailed`) in addition to transport errors.
//!
//! # Invariants
//! - Repository constructors reject connections that are not migrated.
//! - No repository call spans more than one entity.

pub mod comment_repo;
pub mod error;
pub mod post_repo;
mod schema;
pub mod user_repo;
