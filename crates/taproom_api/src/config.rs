//! Runtime configuration resolved from the process environment.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - Resolution never fails; missing values fall back to defaults.

use std::path::PathBuf;
use taproom_core::default_log_level;

pub const DB_PATH_ENV: &str = "TAPROOM_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TAPROOM_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TAPROOM_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "taproom.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off while this is `None`.
    pub log_dir: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name
    /// to its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV),
        }
    }
}
