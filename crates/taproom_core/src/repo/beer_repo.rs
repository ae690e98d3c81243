//! Beer repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the catalog finders used by the filter resolver.
//! - Enforce optimistic concurrency on writes through the `version` column.
//!
//! # Invariants
//! - Name finders match an unanchored, case-insensitive substring through
//!   the `taproom_fold` SQL function registered by `db::open_db*`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::beer::{Beer, BeerId, BeerStyle};
use crate::model::money::Price;
use crate::query::page::{Page, PageRequest};
use crate::repo::{
    ensure_schema, now_epoch_ms, parse_uuid, parse_version, query_sqlite_page,
    RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

const BEER_COLUMNS: &str = "id,
    version,
    name,
    style,
    upc,
    quantity_on_hand,
    price_cents,
    created_at,
    updated_at";

const NAME_CONTAINS_SQL: &str = "instr(taproom_fold(name), taproom_fold(?)) > 0";
const STYLE_EQUALS_SQL: &str = "style = ?";

/// Persistence provider for catalog entries.
pub trait BeerRepository {
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Beer>>;
    /// Beers whose name contains `name`, ignoring letter case.
    fn find_by_name_like(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Beer>>;
    fn find_by_style(&self, style: BeerStyle, page: &PageRequest) -> RepoResult<Page<Beer>>;
    fn find_by_name_like_and_style(
        &self,
        name: &str,
        style: BeerStyle,
        page: &PageRequest,
    ) -> RepoResult<Page<Beer>>;
    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>>;
    fn exists_by_id(&self, id: BeerId) -> RepoResult<bool>;
    /// Inserts or version-checked updates `beer`, returning the stored row.
    ///
    /// # Errors
    /// - `VersionConflict` when the stored row moved past `beer.version`.
    /// - `NotFound` when a persisted snapshot no longer has a row.
    fn save(&self, beer: &Beer) -> RepoResult<Beer>;
    fn delete_by_id(&self, id: BeerId) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed beer repository.
pub struct SqliteBeerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBeerRepository<'conn> {
    /// Wraps a connection after checking its schema is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }

    fn page(
        &self,
        where_sql: &str,
        binds: Vec<Value>,
        page: &PageRequest,
    ) -> RepoResult<Page<Beer>> {
        query_sqlite_page(
            self.conn,
            "beers",
            BEER_COLUMNS,
            where_sql,
            binds,
            page,
            parse_beer_row,
        )
    }

    fn insert(&self, beer: &Beer) -> RepoResult<()> {
        let now = now_epoch_ms();
        let inserted = self.conn.execute(
            "INSERT INTO beers (
                id,
                version,
                name,
                style,
                upc,
                quantity_on_hand,
                price_cents,
                created_at,
                updated_at
            ) VALUES (?1, 1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ON CONFLICT (id) DO NOTHING;",
            params![
                beer.id.to_string(),
                beer.name.as_str(),
                beer.style.as_str(),
                beer.upc.as_str(),
                beer.quantity_on_hand,
                beer.price.cents(),
                now,
            ],
        )?;
        if inserted == 0 {
            // An unsaved snapshot whose id is already taken is as stale as
            // one whose version moved on.
            return Err(RepoError::VersionConflict {
                id: beer.id,
                expected_version: 0,
            });
        }
        Ok(())
    }

    fn update(&self, beer: &Beer) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE beers
             SET
                name = ?1,
                style = ?2,
                upc = ?3,
                quantity_on_hand = ?4,
                price_cents = ?5,
                version = version + 1,
                updated_at = max(?6, updated_at + 1)
             WHERE id = ?7 AND version = ?8;",
            params![
                beer.name.as_str(),
                beer.style.as_str(),
                beer.upc.as_str(),
                beer.quantity_on_hand,
                beer.price.cents(),
                now_epoch_ms(),
                beer.id.to_string(),
                beer.version,
            ],
        )?;

        if changed == 0 {
            return Err(if self.exists_by_id(beer.id)? {
                RepoError::VersionConflict {
                    id: beer.id,
                    expected_version: beer.version,
                }
            } else {
                RepoError::NotFound(beer.id)
            });
        }
        Ok(())
    }
}

impl BeerRepository for SqliteBeerRepository<'_> {
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.page("1 = 1", Vec::new(), page)
    }

    fn find_by_name_like(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.page(NAME_CONTAINS_SQL, vec![Value::Text(name.to_string())], page)
    }

    fn find_by_style(&self, style: BeerStyle, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.page(
            STYLE_EQUALS_SQL,
            vec![Value::Text(style.as_str().to_string())],
            page,
        )
    }

    fn find_by_name_like_and_style(
        &self,
        name: &str,
        style: BeerStyle,
        page: &PageRequest,
    ) -> RepoResult<Page<Beer>> {
        self.page(
            &format!("{NAME_CONTAINS_SQL} AND {STYLE_EQUALS_SQL}"),
            vec![
                Value::Text(name.to_string()),
                Value::Text(style.as_str().to_string()),
            ],
            page,
        )
    }

    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BEER_COLUMNS} FROM beers WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_beer_row(row)?)),
            None => Ok(None),
        }
    }

    fn exists_by_id(&self, id: BeerId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM beers WHERE id = ?1;", [id.to_string()], |_| {
                Ok(())
            })
            .optional()?;
        Ok(found.is_some())
    }

    fn save(&self, beer: &Beer) -> RepoResult<Beer> {
        if beer.is_persisted() {
            self.update(beer)?;
        } else {
            self.insert(beer)?;
        }
        self.find_by_id(beer.id)?
            .ok_or(RepoError::NotFound(beer.id))
    }

    fn delete_by_id(&self, id: BeerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM beers WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM beers;", [], |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

fn parse_beer_row(row: &Row<'_>) -> RepoResult<Beer> {
    let style_text: String = row.get("style")?;
    let style = style_text.parse::<BeerStyle>().map_err(|_| {
        RepoError::InvalidData(format!("invalid beer style `{style_text}` in beers.style"))
    })?;

    Ok(Beer {
        id: parse_uuid(row, "id")?,
        version: parse_version(row)?,
        name: row.get("name")?,
        style,
        upc: row.get("upc")?,
        quantity_on_hand: row.get("quantity_on_hand")?,
        price: Price::from_cents(row.get("price_cents")?),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

