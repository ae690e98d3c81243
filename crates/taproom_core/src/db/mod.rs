//! SQLite bootstrap for the beer catalog and customer tables.
//!
//! `open_db*` hands out connections with a busy timeout, the `taproom_fold`
//! name-matching function and both table migrations (`0001_beers`,
//! `0002_customers`) applied. A file written by a newer taproom build is
//! refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod functions;
pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file's `user_version` is past the last migration this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "taproom database is at schema version {db_version}, but this build only knows migrations up to {latest_supported} (beers, customers); upgrade taproom to open it"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn newer_schema_message_names_both_versions() {
        let message = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 2,
        }
        .to_string();
        assert!(message.contains("schema version 7"));
        assert!(message.contains("up to 2"));
    }
}
