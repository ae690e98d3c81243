//! Repository layer: persistence provider contracts and implementations.
//!
//! # Responsibility
//! - Define the store-level queries the services consume.
//! - Isolate SQL details from service orchestration.
//! - Offer an in-memory provider with the same observable contract.
//!
//! # Invariants
//! - `save` on a record whose version is 0 inserts it at version 1.
//! - `save` on a persisted record succeeds only if the stored version still
//!   equals the snapshot's version, then bumps it by one.
//! - `updated_at` strictly increases on every successful write.
//! - Providers hand out copies; callers never hold references into storage.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::query::page::{Page, PageRequest};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub mod beer_repo;
pub mod customer_repo;
pub mod memory;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every provider.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(Uuid),
    /// The snapshot being saved is stale: the stored row moved past
    /// `expected_version`.
    VersionConflict {
        id: Uuid,
        expected_version: u32,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// The in-memory store lock was poisoned by a panicking writer.
    StorePoisoned,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::VersionConflict {
                id,
                expected_version,
            } => write!(
                f,
                "record {id} was modified concurrently; version {expected_version} is stale"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::StorePoisoned => write!(f, "in-memory store lock poisoned"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// Next `updated_at` for a write: now, but never at or before the previous
/// stamp.
pub(crate) fn next_update_stamp(previous: i64, now: i64) -> i64 {
    now.max(previous.saturating_add(1))
}

/// Rejects connections that were not opened through `db::open_db*`.
pub(crate) fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Runs a filtered, name-ordered page query plus its matching count.
///
/// `where_sql` is appended after `WHERE` and uses positional `?` binds.
pub(crate) fn query_sqlite_page<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    where_sql: &str,
    binds: Vec<Value>,
    page: &PageRequest,
    parse_row: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Page<T>> {
    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {table} WHERE {where_sql};"),
        params_from_iter(binds.iter()),
        |row| row.get(0),
    )?;

    let mut page_binds = binds;
    page_binds.push(Value::Integer(i64::from(page.page_size())));
    page_binds.push(Value::Integer(
        i64::try_from(page.offset()).unwrap_or(i64::MAX),
    ));

    let mut stmt = conn.prepare(&format!(
        "SELECT {columns} FROM {table}
         WHERE {where_sql}
         ORDER BY name ASC, id ASC
         LIMIT ? OFFSET ?;"
    ))?;
    let mut rows = stmt.query(params_from_iter(page_binds))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_row(row)?);
    }

    Ok(Page::new(
        items,
        u64::try_from(total).unwrap_or(0),
        page,
    ))
}

pub(crate) fn parse_uuid(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

pub(crate) fn parse_version(row: &Row<'_>) -> RepoResult<u32> {
    let raw: i64 = row.get("version")?;
    u32::try_from(raw)
        .ok()
        .filter(|version| *version > 0)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid version value `{raw}`")))
}

#[cfg(test)]
mod tests {
    use super::next_update_stamp;

    #[test]
    fn update_stamp_never_goes_backwards() {
        assert_eq!(next_update_stamp(100, 500), 500);
        assert_eq!(next_update_stamp(500, 500), 501);
        assert_eq!(next_update_stamp(900, 500), 901);
        assert_eq!(next_update_stamp(i64::MAX, 0), i64::MAX);
    }
}
