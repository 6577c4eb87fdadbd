//! Entity services.
//!
//! # Responsibility
//! - Apply the single business rule of each entity above the repository.
//! - Keep the shell decoupled from SQL and error-code details.
//!
//! # Invariants
//! - Update/delete re-fetch the target first and surface `NotFound` before
//!   mutating.

pub mod comment_service;
pub mod error;
pub mod post_service;
pub mod user_service;
