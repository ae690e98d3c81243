//! In-memory persistence providers.
//!
//! # Responsibility
//! - Back services in tests and ephemeral setups without SQLite.
//! - Mirror the SQLite providers' ordering, matching and version rules.
//!
//! # Invariants
//! - Every operation holds the store mutex for its whole duration.
//! - Reads and writes exchange clones; mutating a returned record never
//!   changes stored state.

use crate::model::beer::{Beer, BeerId, BeerStyle};
use crate::model::customer::{Customer, CustomerId};
use crate::query::filter::{BeerFilter, CustomerFilter};
use crate::query::page::{Page, PageRequest};
use crate::repo::beer_repo::BeerRepository;
use crate::repo::customer_repo::CustomerRepository;
use crate::repo::{next_update_stamp, now_epoch_ms, RepoError, RepoResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Record kinds the generic in-memory store can hold.
pub trait StoredRecord: Clone {
    fn id(&self) -> Uuid;
    fn version(&self) -> u32;
    fn name(&self) -> &str;
    fn created_at(&self) -> i64;
    fn updated_at(&self) -> i64;
    /// Overwrites the server-managed bookkeeping fields.
    fn stamp(&mut self, version: u32, created_at: i64, updated_at: i64);
}

impl StoredRecord for Beer {
    fn id(&self) -> Uuid {
        self.id
    }
    fn version(&self) -> u32 {
        self.version
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> i64 {
        self.created_at
    }
    fn updated_at(&self) -> i64 {
        self.updated_at
    }
    fn stamp(&mut self, version: u32, created_at: i64, updated_at: i64) {
        self.version = version;
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

impl StoredRecord for Customer {
    fn id(&self) -> Uuid {
        self.id
    }
    fn version(&self) -> u32 {
        self.version
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn created_at(&self) -> i64 {
        self.created_at
    }
    fn updated_at(&self) -> i64 {
        self.updated_at
    }
    fn stamp(&mut self, version: u32, created_at: i64, updated_at: i64) {
        self.version = version;
        self.created_at = created_at;
        self.updated_at = updated_at;
    }
}

/// Keyed record store guarded by one mutex.
#[derive(Debug)]
pub struct MemoryStore<T> {
    rows: Mutex<HashMap<Uuid, T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: StoredRecord> MemoryStore<T> {
    fn lock(&self) -> RepoResult<MutexGuard<'_, HashMap<Uuid, T>>> {
        self.rows.lock().map_err(|_| RepoError::StorePoisoned)
    }

    /// Matching rows sorted by `(name, id)`, windowed by `page`.
    pub fn find_page(
        &self,
        page: &PageRequest,
        predicate: impl Fn(&T) -> bool,
    ) -> RepoResult<Page<T>> {
        let rows = self.lock()?;
        let mut matching: Vec<&T> = rows.values().filter(|row| predicate(row)).collect();
        matching.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(page.page_size() as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, total, page))
    }

    pub fn find_by_id(&self, id: Uuid) -> RepoResult<Option<T>> {
        Ok(self.lock()?.get(&id).cloned())
    }

    pub fn exists_by_id(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.lock()?.contains_key(&id))
    }

    pub fn save(&self, record: &T) -> RepoResult<T> {
        let mut rows = self.lock()?;
        let id = record.id();
        let now = now_epoch_ms();
        let mut stored = record.clone();

        if record.version() == 0 {
            if rows.contains_key(&id) {
                return Err(RepoError::VersionConflict {
                    id,
                    expected_version: 0,
                });
            }
            stored.stamp(1, now, now);
        } else {
            let current = rows.get(&id).ok_or(RepoError::NotFound(id))?;
            if current.version() != record.version() {
                return Err(RepoError::VersionConflict {
                    id,
                    expected_version: record.version(),
                });
            }
            stored.stamp(
                current.version() + 1,
                current.created_at(),
                next_update_stamp(current.updated_at(), now),
            );
        }

        rows.insert(id, stored.clone());
        Ok(stored)
    }

    pub fn delete_by_id(&self, id: Uuid) -> RepoResult<()> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }

    pub fn count(&self) -> RepoResult<u64> {
        Ok(self.lock()?.len() as u64)
    }
}

/// In-memory beer repository.
#[derive(Debug, Default)]
pub struct MemoryBeerRepository {
    store: MemoryStore<Beer>,
}

impl MemoryBeerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn filtered(&self, filter: BeerFilter, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.store.find_page(page, |beer| filter.matches(beer))
    }
}

impl BeerRepository for MemoryBeerRepository {
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.filtered(BeerFilter::All, page)
    }

    fn find_by_name_like(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.filtered(BeerFilter::NameContains(name.to_string()), page)
    }

    fn find_by_style(&self, style: BeerStyle, page: &PageRequest) -> RepoResult<Page<Beer>> {
        self.filtered(BeerFilter::Style(style), page)
    }

    fn find_by_name_like_and_style(
        &self,
        name: &str,
        style: BeerStyle,
        page: &PageRequest,
    ) -> RepoResult<Page<Beer>> {
        self.filtered(
            BeerFilter::NameContainsAndStyle(name.to_string(), style),
            page,
        )
    }

    fn find_by_id(&self, id: BeerId) -> RepoResult<Option<Beer>> {
        self.store.find_by_id(id)
    }

    fn exists_by_id(&self, id: BeerId) -> RepoResult<bool> {
        self.store.exists_by_id(id)
    }

    fn save(&self, beer: &Beer) -> RepoResult<Beer> {
        self.store.save(beer)
    }

    fn delete_by_id(&self, id: BeerId) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    fn count(&self) -> RepoResult<u64> {
        self.store.count()
    }
}

/// In-memory customer repository.
#[derive(Debug, Default)]
pub struct MemoryCustomerRepository {
    store: MemoryStore<Customer>,
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerRepository for MemoryCustomerRepository {
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Customer>> {
        self.store.find_page(page, |_| true)
    }

    fn find_by_name_like(&self, name: &str, page: &PageRequest) -> RepoResult<Page<Customer>> {
        let filter = CustomerFilter::NameContains(name.to_string());
        self.store.find_page(page, |customer| filter.matches(customer))
    }

    fn find_by_id(&self, id: CustomerId) -> RepoResult<Option<Customer>> {
        self.store.find_by_id(id)
    }

    fn exists_by_id(&self, id: CustomerId) -> RepoResult<bool> {
        self.store.exists_by_id(id)
    }

    fn save(&self, customer: &Customer) -> RepoResult<Customer> {
        self.store.save(customer)
    }

    fn delete_by_id(&self, id: CustomerId) -> RepoResult<()> {
        self.store.delete_by_id(id)
    }

    fn count(&self) -> RepoResult<u64> {
        self.store.count()
    }
}
