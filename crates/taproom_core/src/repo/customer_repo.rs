//! Customer repository contract and SQLite implementation.

use crate::model::customer::{Customer, CustomerId};
use crate::query::page::{Page, PageRequest};
use crate::repo::{
    ensure_schema, now_epoch_ms, parse_uuid, parse_version, query_sqlite_page, RepoError,
    RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CUSTOMER_COLUMNS: &str = "id, version, name, email, created_at, updated_at";

/// Persistence provider for customer entries.
///
/// Write semantics match `BeerRepository::save`.
pub trait CustomerRepository {
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Customer>>;
    fn find_by_name_like(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Customer>>;
    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>>;
    fn exists_by_id(&self, id: CustomerId) -> RepoResult<bool>;
    fn save(&self, customer: &Customer) -> RepoResult<Customer>;
    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed customer repository.
pub struct SqliteCustomerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCustomerRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl CustomerRepository for SqliteCustomerRepository<'_> {
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Customer>> {
        query_sqlite_page(
            self.conn,
            "customers",
            CUSTOMER_COLUMNS,
            "1 = 1",
            Vec::new(),
            page,
            parse_customer_row,
        )
    }

    fn find_by_name_like(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Customer>> {
        query_sqlite_page(
            self.conn,
            "customers",
            CUSTOMER_COLUMNS,
            "instr(taproom_fold(name), taproom_fold(?)) > 0",
            vec![Value::Text(name.to_string())],
            page,
            parse_customer_row,
        )
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_customer_row(row)?)),
            None => Ok(None),
        }
    }

    fn exists_by_id(&self, id: CustomerId) -> RepoResult<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM customers WHERE id = ?1;",
                [id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        let now = now_epoch_ms();
        if customer.is_persisted() {
            let changed = self.conn.execute(
                "UPDATE customers
                 SET
                    name = ?1,
                    email = ?2,
                    version = version + 1,
                    updated_at = max(?3, updated_at + 1)
                 WHERE id = ?4 AND version = ?5;",
                params![
                    customer.name.as_str(),
                    customer.email.as_deref(),
                    now,
                    customer.id.to_string(),
                    customer.version,
                ],
            )?;
            if changed == 0 {
                return Err(if self.exists_by_id(customer.id)? {
                    RepoError::VersionConflict {
                        id: customer.id,
                        expected_version: customer.version,
                    }
                } else {
                    RepoError::NotFound(customer.id)
                });
            }
        } else {
            let inserted = self.conn.execute(
                "INSERT INTO customers (id, version, name, email, created_at, updated_at)
                 VALUES (?1, 1, ?2, ?3, ?4, ?4)
                 ON CONFLICT (id) DO NOTHING;",
                params![
                    customer.id.to_string(),
                    customer.name.as_str(),
                    customer.email.as_deref(),
                    now,
                ],
            )?;
            if inserted == 0 {
                return Err(RepoError::VersionConflict {
                    id: customer.id,
                    expected_version: 0,
                });
            }
        }

        self.find_by_id(customer.id)?
            .ok_or(RepoError::NotFound(customer.id))
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM customers;", [], |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or(0))
    }
}

fn parse_customer_row(row: &Row<'_>) -> RepoResult<Customer> {
    Ok(Customer {
        id: parse_uuid(row, "id")?,
        version: parse_version(row)?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
