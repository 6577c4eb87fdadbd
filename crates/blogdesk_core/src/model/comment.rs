//! Comment model.
//!
//! # Invariants
//! - At most one comment exists per `(user_id, post_id)` pair.
//! - `deleted_at` is persisted but no operation sets it.

use super::post::PostId;
use super::user::UserId;
use super::{require_non_blank, EpochMs, ValidationError};
use serde::{Deserialize, Serialize};

pub type CommentId = i64;

/// Stored comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub user_id: UserId,
    pub post_id: PostId,
    pub content: String,
    pub is_published: bool,
    pub published_at: Option<EpochMs>,
    pub deleted_at: Option<EpochMs>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Author-editable comment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentDraft {
    pub content: String,
    pub is_published: bool,
}

impl CommentDraft {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into().trim().to_string(),
            is_published: false,
        }
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("content", &self.content)
    }
}
