//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - One SQL statement per user operation over the `users` table.
//! - Translate missing rows and unique violations into `RepoError`.
//!
//! # Invariants
//! - Write paths call `UserFields::validate()` before SQL.
//! - `password_hash` is never logged.

use super::error::{map_write_error, RepoError, RepoResult};
use super::schema::{collect_rows, ensure_table_ready, returning_row};
use crate::model::user::{User, UserFields, UserId};
use log::debug;
use rusqlite::{params, Connection, Row};

const ENTITY: &str = "user";

const USER_COLUMNS: &str = "id, name, email, username, password_hash, created_at, updated_at";

/// Data access for user accounts.
pub trait UserRepository {
    /// Inserts a user and returns the stored row with its assigned id.
    fn create_user(&self, fields: &UserFields) -> RepoResult<User>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: UserId) -> RepoResult<User>;
    fn get_user_by_email(&self, email: &str) -> RepoResult<User>;
    fn get_user_by_username(&self, username: &str) -> RepoResult<User>;
    /// Overwrites every writable column of user `id`.
    fn update_user(&self, id: UserId, fields: &UserFields) -> RepoResult<()>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Builds a repository over a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(
            conn,
            "users",
            &[
                "id",
                "name",
                "email",
                "username",
                "password_hash",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }

    fn get_one(&self, filter: &str, value: &dyn rusqlite::ToSql, key: String) -> RepoResult<User> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE {filter};"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return parse_user_row(row);
        }

        Err(RepoError::not_found(ENTITY, key))
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, fields: &UserFields) -> RepoResult<User> {
        fields.validate()?;

        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO users (name, email, username, password_hash)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {USER_COLUMNS};"
        ))?;
        let mut rows = stmt
            .query(params![
                fields.name.as_str(),
                fields.email.as_str(),
                fields.username.as_str(),
                fields.password_hash.as_str(),
            ])
            .map_err(map_write_error)?;
        let user = returning_row(&mut rows, ENTITY, parse_user_row)?;

        debug!("event=user_insert module=repo status=ok id={}", user.id);
        Ok(user)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        collect_rows(&mut rows, parse_user_row)
    }

    fn get_user(&self, id: UserId) -> RepoResult<User> {
        self.get_one("id = ?1", &id, format!("id={id}"))
    }

    fn get_user_by_email(&self, email: &str) -> RepoResult<User> {
        let email = email.trim();
        self.get_one("email = ?1", &email, format!("email={email}"))
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<User> {
        let username = username.trim();
        self.get_one("username = ?1", &username, format!("username={username}"))
    }

    fn update_user(&self, id: UserId, fields: &UserFields) -> RepoResult<()> {
        fields.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE users
                 SET
                    name = ?2,
                    email = ?3,
                    username = ?4,
                    password_hash = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE id = ?1;",
                params![
                    id,
                    fields.name.as_str(),
                    fields.email.as_str(),
                    fields.username.as_str(),
                    fields.password_hash.as_str(),
                ],
            )
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::UpdateFailed { entity: ENTITY, id });
        }
        Ok(())
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id])
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(RepoError::DeleteFailed { entity: ENTITY, id });
        }
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
