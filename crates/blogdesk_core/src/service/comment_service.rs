//! Comment use-case service.
//!
//! # Invariants
//! - One comment per `(user, post)`; a second create is `CommentExists`.
//! - The target post must exist before a comment is written or listed.
//! - Only the authoring session may update or delete a comment.

use super::error::{ServiceError, ServiceResult};
use crate::auth::Session;
use crate::model::comment::{Comment, CommentDraft, CommentId};
use crate::model::post::PostId;
use crate::model::user::UserId;
use crate::repo::comment_repo::CommentRepository;
use crate::repo::error::RepoError;
use crate::repo::post_repo::PostRepository;
use log::{info, warn};

const PAIR_CONSTRAINT: &str = "comments.user_id, comments.post_id";

/// Comment service facade.
///
/// Holds a post repository to resolve comment targets.
pub struct CommentService<C: CommentRepository, P: PostRepository> {
    comments: C,
    posts: P,
}

impl<C: CommentRepository, P: PostRepository> CommentService<C, P> {
    pub fn new(comments: C, posts: P) -> Self {
        Self { comments, posts }
    }

    /// Adds the session user's comment to `post_id`.
    pub fn create_comment(
        &self,
        session: &Session,
        post_id: PostId,
        draft: &CommentDraft,
    ) -> ServiceResult<Comment> {
        self.ensure_post_exists(post_id)?;

        let user_id = session.user_id();
        let comment = self
            .comments
            .create_comment(user_id, post_id, draft)
            .map_err(|err| {
                if err.is_duplicate_of(PAIR_CONSTRAINT) {
                    ServiceError::CommentExists { user_id, post_id }
                } else {
                    err.into()
                }
            })?;
        info!(
            "event=comment_create module=service status=ok id={} post_id={}",
            comment.id, comment.post_id
        );
        Ok(comment)
    }

    pub fn list_comments(&self) -> ServiceResult<Vec<Comment>> {
        Ok(self.comments.list_comments()?)
    }

    pub fn list_comments_by_user(&self, user_id: UserId) -> ServiceResult<Vec<Comment>> {
        Ok(self.comments.list_comments_by_user(user_id)?)
    }

    pub fn list_comments_by_post(&self, post_id: PostId) -> ServiceResult<Vec<Comment>> {
        self.ensure_post_exists(post_id)?;
        Ok(self.comments.list_comments_by_post(post_id)?)
    }

    pub fn get_comment(&self, id: CommentId) -> ServiceResult<Comment> {
        Ok(self.comments.get_comment(id)?)
    }

    pub fn get_comment_for_post(&self, user_id: UserId, post_id: PostId) -> ServiceResult<Comment> {
        Ok(self.comments.get_comment_by_user_and_post(user_id, post_id)?)
    }

    /// Replaces the fields of comment `id`; returns the previous snapshot.
    pub fn update_comment(
        &self,
        session: &Session,
        id: CommentId,
        draft: &CommentDraft,
    ) -> ServiceResult<Comment> {
        let existing = self.owned_comment(session, id)?;
        if let Err(err) = self.comments.update_comment(id, session.user_id(), draft) {
            warn!(
                "event=comment_update module=service status=error id={} error={}",
                id, err
            );
            return Err(err.into());
        }
        Ok(existing)
    }

    /// Deletes comment `id`; returns the removed row.
    pub fn delete_comment(&self, session: &Session, id: CommentId) -> ServiceResult<Comment> {
        let existing = self.owned_comment(session, id)?;
        if let Err(err) = self.comments.delete_comment(id) {
            warn!(
                "event=comment_delete module=service status=error id={} error={}",
                id, err
            );
            return Err(err.into());
        }
        Ok(existing)
    }

    fn ensure_post_exists(&self, post_id: PostId) -> ServiceResult<()> {
        match self.posts.get_post(post_id) {
            Ok(_) => Ok(()),
            Err(RepoError::NotFound { .. }) => Err(ServiceError::PostNotFound(post_id)),
            Err(err) => Err(err.into()),
        }
    }

    fn owned_comment(&self, session: &Session, id: CommentId) -> ServiceResult<Comment> {
        let comment = self.comments.get_comment(id)?;
        if comment.user_id != session.user_id() {
            return Err(ServiceError::NotOwner {
                entity: "comment",
                id,
            });
        }
        Ok(comment)
    }
}
