//! Post repository contract and SQLite implementation.
//!
//! # Invariants
//! - `posts.title` uniqueness is enforced by the store, not by this layer.
//! - `published_at` is stamped by SQL: set on first publish, kept while
//!   published, cleared on unpublish.

use super::error::{map_write_error, RepoError, RepoResult};
use super::schema::{
    bool_to_int, collect_rows, ensure_table_ready, parse_flag, returning_row,
};
use crate::model::post::{Post, PostDraft, PostId};
use crate::model::user::UserId;
use log::debug;
use rusqlite::{params, Connection, Row};

const ENTITY: &str = "post";

const POST_COLUMNS: &str = "id, user_id, title, content, thumbnail, is_published, published_at, \
                            created_at, updated_at";

/// Data access for blog posts.
pub trait PostRepository {
    /// Inserts a post owned by `user_id`.
    fn create_post(&self, user_id: UserId, draft: &PostDraft) -> RepoResult<Post>;
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
    fn list_posts_by_user(&self, user_id: UserId) -> RepoResult<Vec<Post>>;
    fn get_post(&self, id: PostId) -> RepoResult<Post>;
    fn get_post_by_title(&self, title: &str) -> RepoResult<Post>;
    /// Overwrites post `id`, re-stamping its owner with `user_id`.
    fn update_post(&self, id: PostId, user_id: UserId, draft: &PostDraft) -> RepoResult<()>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "posts",
            &[
                "id",
                "user_id",
                "title",
                "content",
                "thumbnail",
                "is_published",
                "published_at",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, user_id: UserId, draft: &PostDraft) -> RepoResult<Post> {
        draft.validate()?;

        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO posts (user_id, title, content, thumbnail, is_published, published_at)
             VALUES (
                ?1, ?2, ?3, ?4, ?5,
                CASE WHEN ?5 = 1 THEN (strftime('%s', 'now') * 1000) ELSE NULL END
             )
             RETURNING {POST_COLUMNS};"
        ))?;
        let mut rows = stmt
            .query(params![
                user_id,
                draft.title.as_str(),
                draft.content.as_str(),
                draft.thumbnail.as_deref(),
                bool_to_int(draft.is_published),
            ])
            .map_err(map_write_error)?;
        let post = returning_row(&mut rows, ENTITY, parse_post_row)?;

        debug!(
            "event=post_insert module=repo status=ok id={} user_id={}",
            post.id, post.user_id
        );
        Ok(post)
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_rows(&mut rows, parse_post_row)
    }

    fn list_posts_by_user(&self, user_id: UserId) -> RepoResult<Vec<Post>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([user_id])?;
        collect_rows(&mut rows, parse_post_row)
    }

    fn get_post(&self, id: PostId) -> RepoResult<Post> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_post_row(row);
        }

        Err(RepoError::not_found(ENTITY, format!("id={id}")))
    }

    fn get_post_by_title(&self, title: &str) -> RepoResult<Post> {
        let title = title.trim();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {POST_COLUMNS} FROM posts WHERE title = ?1;"))?;
        let mut rows = stmt.query([title])?;
        if let Some(row) = rows.next()? {
            return parse_post_row(row);
        }

        Err(RepoError::not_found(ENTITY, format!("title={title}")))
    }

    fn update_post(&self, id: PostId, user_id: UserId, draft: &PostDraft) -> RepoResult<()> {
        draft.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE posts
                 SET
                    user_id = ?2,
                    title = ?3,
                    content = ?4,
                    thumbnail = ?5,
                    is_published = ?6,
                    published_at = CASE
                        WHEN ?6 = 1 THEN COALESCE(published_at, (strftime('%s', 'now') * 1000))
                        ELSE NULL
                    END,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    id,
                    user_id,
                    draft.title.as_str(),
                    draft.content.as_str(),
                    draft.thumbnail.as_deref(),
                    bool_to_int(draft.is_published),
                ],
            )
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::UpdateFailed { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id])
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::DeleteFailed { entity: ENTITY, id });
        }
        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    Ok(Post {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        thumbnail: row.get("thumbnail")?,
        is_published: parse_flag(row, "posts", "is_published")?,
        published_at: row.get("published_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
