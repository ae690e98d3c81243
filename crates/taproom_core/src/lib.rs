//! Core resource logic for the taproom catalog and customer stores.
//! This crate owns filtering, pagination, projection and update semantics.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod seed;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::beer::{Beer, BeerDraft, BeerId, BeerInput, BeerStyle, UnknownBeerStyle};
pub use model::customer::{Customer, CustomerDraft, CustomerId, CustomerInput};
pub use model::money::{Price, PriceParseError};
pub use model::validation::{FieldViolation, ValidationErrors};
pub use query::filter::{BeerFilter, CustomerFilter};
pub use query::page::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use repo::beer_repo::{BeerRepository, SqliteBeerRepository};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::memory::{MemoryBeerRepository, MemoryCustomerRepository};
pub use repo::{RepoError, RepoResult};
pub use seed::{seed_data, SeedReport};
pub use service::beer_service::{BeerListQuery, BeerService};
pub use service::customer_service::{CustomerListQuery, CustomerService};
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
