//! Blog post model.
//!
//! # Invariants
//! - `title` is unique across all posts, not per user.
//! - `published_at` is set exactly when `is_published` is true.

use super::user::UserId;
use super::{require_non_blank, trim_optional, EpochMs, ValidationError};
use serde::{Deserialize, Serialize};

pub type PostId = i64;

/// Stored post row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    /// Free-form image reference (path or URL).
    pub thumbnail: Option<String>,
    pub is_published: bool,
    pub published_at: Option<EpochMs>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

/// Author-editable post fields.
///
/// Ownership and publication time are stamped by the store layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub thumbnail: Option<String>,
    pub is_published: bool,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            content: content.into().trim().to_string(),
            thumbnail: None,
            is_published: false,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = trim_optional(thumbnail);
        self
    }

    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank("title", &self.title)?;
        require_non_blank("content", &self.content)
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            thumbnail: post.thumbnail.clone(),
            is_published: post.is_published,
        }
    }
}
