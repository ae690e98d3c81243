//! Customer use-case service.
//!
//! Mirrors `BeerService` minus the style filter and inventory projection.

use crate::model::customer::{Customer, CustomerId, CustomerInput};
use crate::query::filter::CustomerFilter;
use crate::query::page::{Page, PageRequest};
use crate::repo::customer_repo::CustomerRepository;
use crate::service::merge::{patch_customer, replace_customer};
use crate::service::{absent_on_missing, ServiceResult};
use log::{debug, info, warn};

/// Raw customer list parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerListQuery {
    pub name: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

pub struct CustomerService<R: CustomerRepository> {
    repo: R,
}

impl<R: CustomerRepository> CustomerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_customers(&self, query: &CustomerListQuery) -> ServiceResult<Page<Customer>> {
        let page = PageRequest::normalize(query.page_number, query.page_size);
        let result = match CustomerFilter::resolve(query.name.as_deref()) {
            CustomerFilter::NameContains(name) => self.repo.find_by_name_like(&name, &page)?,
            CustomerFilter::All => self.repo.find_all(&page)?,
        };
        debug!(
            "event=customer_list module=service status=ok page={} size={} returned={}",
            page.page_number(),
            page.page_size(),
            result.items.len()
        );
        Ok(result)
    }

    pub fn get_customer(&self, id: CustomerId) -> ServiceResult<Option<Customer>> {
        Ok(self.repo.find_by_id(id)?)
    }

    pub fn create_customer(&self, input: &CustomerInput) -> ServiceResult<Customer> {
        let draft = input.validate().inspect_err(|errors| {
            warn!(
                "event=customer_create module=service status=invalid violations={}",
                errors.violations().len()
            );
        })?;
        let saved = self.repo.save(&Customer::new(draft))?;
        info!(
            "event=customer_create module=service status=ok id={} version={}",
            saved.id, saved.version
        );
        Ok(saved)
    }

    pub fn replace_customer(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> ServiceResult<Option<Customer>> {
        let draft = input.validate()?;
        let Some(mut existing) = self.repo.find_by_id(id)? else {
            info!("event=customer_replace module=service status=not_found id={id}");
            return Ok(None);
        };
        replace_customer(&mut existing, draft);
        let saved = absent_on_missing(self.repo.save(&existing))?;
        info!(
            "event=customer_replace module=service status={} id={id}",
            if saved.is_some() { "ok" } else { "not_found" }
        );
        Ok(saved)
    }

    pub fn patch_customer(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> ServiceResult<Option<Customer>> {
        input.validate_patch()?;
        let Some(mut existing) = self.repo.find_by_id(id)? else {
            info!("event=customer_patch module=service status=not_found id={id}");
            return Ok(None);
        };
        patch_customer(&mut existing, input);
        let saved = absent_on_missing(self.repo.save(&existing))?;
        info!(
            "event=customer_patch module=service status={} id={id}",
            if saved.is_some() { "ok" } else { "not_found" }
        );
        Ok(saved)
    }

    pub fn delete_customer(&self, id: CustomerId) -> ServiceResult<bool> {
        if !self.repo.exists_by_id(id)? {
            info!("event=customer_delete module=service status=not_found id={id}");
            return Ok(false);
        }
        let removed = absent_on_missing(self.repo.delete_by_id(id))?.is_some();
        info!("event=customer_delete module=service status=ok id={id} removed={removed}");
        Ok(removed)
    }

    pub fn count_customers(&self) -> ServiceResult<u64> {
        Ok(self.repo.count()?)
    }
}
