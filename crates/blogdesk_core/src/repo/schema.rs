//! Schema readiness checks and row helpers shared by the SQLite repositories.

use super::error::{map_write_error, RepoError, RepoResult};
use crate::db::migrations::latest_version;
use rusqlite::{Connection, Row, Rows};

/// Verifies `conn` is migrated and `table` carries every column in `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    let present = table_columns(conn, table)?;
    for column in columns {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut names = Vec::new();
    while let Some(row) = rows.next()? {
        names.push(row.get(1)?);
    }
    Ok(names)
}

/// Drains `rows` through `parse`.
pub(crate) fn collect_rows<T>(
    rows: &mut Rows<'_>,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

/// Reads the single row produced by an `INSERT ... RETURNING` statement.
///
/// Steps the statement to completion so the write is finalized before the
/// statement is dropped.
pub(crate) fn returning_row<T>(
    rows: &mut Rows<'_>,
    entity: &str,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<T> {
    let item = match rows.next().map_err(map_write_error)? {
        Some(row) => parse(row)?,
        None => {
            return Err(RepoError::InvalidData(format!(
                "insert returned no {entity} row"
            )))
        }
    };
    while rows.next().map_err(map_write_error)?.is_some() {}
    Ok(item)
}

pub(crate) fn parse_flag(row: &Row<'_>, table: &str, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
