//! Scalar SQL functions installed on every taproom connection.
//!
//! # Invariants
//! - `taproom_fold(text)` returns exactly `query::filter::fold_case(text)`,
//!   so SQLite and in-memory name matching agree beyond ASCII.
//! - `NULL` input yields `NULL`.

use crate::query::filter::fold_case;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub const FOLD_CASE_FN: &str = "taproom_fold";

pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|value| fold_case(&value)))
        },
    )
}
