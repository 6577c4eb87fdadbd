//! Post use-case service.
//!
//! # Invariants
//! - Titles are unique across all posts; duplicates become `TitleTaken`.
//! - Only the owning session may update or delete a post.
//! - Update/delete return the row as it was before the mutation.

use super::error::{ServiceError, ServiceResult};
use crate::auth::Session;
use crate::model::post::{Post, PostDraft, PostId};
use crate::model::user::UserId;
use crate::repo::error::RepoError;
use crate::repo::post_repo::PostRepository;
use log::{info, warn};

/// Post service facade over a repository implementation.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a post owned by the session user.
    pub fn create_post(&self, session: &Session, draft: &PostDraft) -> ServiceResult<Post> {
        let post = self
            .repo
            .create_post(session.user_id(), draft)
            .map_err(|err| map_title_conflict(err, draft))?;
        info!(
            "event=post_create module=service status=ok id={} user_id={}",
            post.id, post.user_id
        );
        Ok(post)
    }

    pub fn list_posts(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.repo.list_posts()?)
    }

    pub fn list_posts_by_user(&self, user_id: UserId) -> ServiceResult<Vec<Post>> {
        Ok(self.repo.list_posts_by_user(user_id)?)
    }

    pub fn get_post(&self, id: PostId) -> ServiceResult<Post> {
        Ok(self.repo.get_post(id)?)
    }

    pub fn get_post_by_title(&self, title: &str) -> ServiceResult<Post> {
        Ok(self.repo.get_post_by_title(title)?)
    }

    /// Replaces the fields of post `id`; returns the previous snapshot.
    pub fn update_post(
        &self,
        session: &Session,
        id: PostId,
        draft: &PostDraft,
    ) -> ServiceResult<Post> {
        let existing = self.owned_post(session, id)?;
        if let Err(err) = self.repo.update_post(id, session.user_id(), draft) {
            warn!(
                "event=post_update module=service status=error id={} error={}",
                id, err
            );
            return Err(map_title_conflict(err, draft));
        }
        Ok(existing)
    }

    /// Deletes post `id` and its comments; returns the removed row.
    pub fn delete_post(&self, session: &Session, id: PostId) -> ServiceResult<Post> {
        let existing = self.owned_post(session, id)?;
        if let Err(err) = self.repo.delete_post(id) {
            warn!(
                "event=post_delete module=service status=error id={} error={}",
                id, err
            );
            return Err(err.into());
        }
        Ok(existing)
    }

    fn owned_post(&self, session: &Session, id: PostId) -> ServiceResult<Post> {
        let post = self.repo.get_post(id)?;
        if post.user_id != session.user_id() {
            return Err(ServiceError::NotOwner { entity: "post", id });
        }
        Ok(post)
    }
}

fn map_title_conflict(err: RepoError, draft: &PostDraft) -> ServiceError {
    if err.is_duplicate_of("posts.title") {
        return ServiceError::TitleTaken(draft.title.clone());
    }
    err.into()
}
