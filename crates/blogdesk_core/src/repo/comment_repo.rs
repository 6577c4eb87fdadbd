//! Comment repository contract and SQLite implementation.
//!
//! # Invariants
//! - `(user_id, post_id)` uniqueness is enforced by the store.
//! - `deleted_at` is read back but never written here.

use super::error::{map_write_error, RepoError, RepoResult};
use super::schema::{
    bool_to_int, collect_rows, ensure_table_ready, parse_flag, returning_row,
};
use crate::model::comment::{Comment, CommentDraft, CommentId};
use crate::model::post::PostId;
use crate::model::user::UserId;
use log::debug;
use rusqlite::{params, Connection, Row};

const ENTITY: &str = "comment";

const COMMENT_COLUMNS: &str = "id, user_id, post_id, content, is_published, published_at, \
                               deleted_at, created_at, updated_at";

/// Data access for post comments.
pub trait CommentRepository {
    fn create_comment(
        &self,
        user_id: UserId,
        post_id: PostId,
        draft: &CommentDraft,
    ) -> RepoResult<Comment>;
    fn list_comments(&self) -> RepoResult<Vec<Comment>>;
    fn list_comments_by_user(&self, user_id: UserId) -> RepoResult<Vec<Comment>>;
    fn list_comments_by_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>>;
    fn get_comment(&self, id: CommentId) -> RepoResult<Comment>;
    /// Looks up the single comment `user_id` left on `post_id`.
    fn get_comment_by_user_and_post(&self, user_id: UserId, post_id: PostId)
        -> RepoResult<Comment>;
    /// Overwrites comment `id`, re-stamping its author with `user_id`.
    fn update_comment(
        &self,
        id: CommentId,
        user_id: UserId,
        draft: &CommentDraft,
    ) -> RepoResult<()>;
    fn delete_comment(&self, id: CommentId) -> RepoResult<()>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "comments",
            &[
                "id",
                "user_id",
                "post_id",
                "content",
                "is_published",
                "published_at",
                "deleted_at",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }

    fn list_where(&self, filter: &str, value: i64) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE {filter} ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([value])?;
        collect_rows(&mut rows, parse_comment_row)
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(
        &self,
        user_id: UserId,
        post_id: PostId,
        draft: &CommentDraft,
    ) -> RepoResult<Comment> {
        draft.validate()?;

        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO comments (user_id, post_id, content, is_published, published_at)
             VALUES (
                ?1, ?2, ?3, ?4,
                CASE WHEN ?4 = 1 THEN (strftime('%s', 'now') * 1000) ELSE NULL END
             )
             RETURNING {COMMENT_COLUMNS};"
        ))?;
        let mut rows = stmt
            .query(params![
                user_id,
                post_id,
                draft.content.as_str(),
                bool_to_int(draft.is_published),
            ])
            .map_err(map_write_error)?;
        let comment = returning_row(&mut rows, ENTITY, parse_comment_row)?;

        debug!(
            "event=comment_insert module=repo status=ok id={} user_id={} post_id={}",
            comment.id, comment.user_id, comment.post_id
        );
        Ok(comment)
    }

    fn list_comments(&self) -> RepoResult<Vec<Comment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        collect_rows(&mut rows, parse_comment_row)
    }

    fn list_comments_by_user(&self, user_id: UserId) -> RepoResult<Vec<Comment>> {
        self.list_where("user_id = ?1", user_id)
    }

    fn list_comments_by_post(&self, post_id: PostId) -> RepoResult<Vec<Comment>> {
        self.list_where("post_id = ?1", post_id)
    }

    fn get_comment(&self, id: CommentId) -> RepoResult<Comment> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1;"
        ))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_comment_row(row);
        }

        Err(RepoError::not_found(ENTITY, format!("id={id}")))
    }

    fn get_comment_by_user_and_post(
        &self,
        user_id: UserId,
        post_id: PostId,
    ) -> RepoResult<Comment> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE user_id = ?1 AND post_id = ?2;"
        ))?;
        let mut rows = stmt.query([user_id, post_id])?;
        if let Some(row) = rows.next()? {
            return parse_comment_row(row);
        }

        Err(RepoError::not_found(
            ENTITY,
            format!("user_id={user_id} post_id={post_id}"),
        ))
    }

    fn update_comment(
        &self,
        id: CommentId,
        user_id: UserId,
        draft: &CommentDraft,
    ) -> RepoResult<()> {
        draft.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE comments
                 SET
                    user_id = ?2,
                    content = ?3,
                    is_published = ?4,
                    published_at = CASE
                        WHEN ?4 = 1 THEN COALESCE(published_at, (strftime('%s', 'now') * 1000))
                        ELSE NULL
                    END,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    id,
                    user_id,
                    draft.content.as_str(),
                    bool_to_int(draft.is_published),
                ],
            )
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::UpdateFailed { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete_comment(&self, id: CommentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id])
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::DeleteFailed { entity: ENTITY, id });
        }
        Ok(())
    }
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        post_id: row.get("post_id")?,
        content: row.get("content")?,
        is_published: parse_flag(row, "comments", "is_published")?,
        published_at: row.get("published_at")?,
        deleted_at: row.get("deleted_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
