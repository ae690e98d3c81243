//! Beer catalog use-case service.
//!
//! # Responsibility
//! - Resolve list parameters into one repository query and project the page.
//! - Run create/replace/patch/delete as lookup → apply → persist sequences.
//!
//! # Invariants
//! - Create and replace validate the whole payload before any write.
//! - Patch validates only the values it carries.
//! - Server-managed fields are never taken from payloads.

use crate::model::beer::{Beer, BeerId, BeerInput, BeerStyle};
use crate::query::filter::BeerFilter;
use crate::query::page::{Page, PageRequest};
use crate::query::projection::project_inventory;
use crate::repo::beer_repo::BeerRepository;
use crate::service::merge::{patch_beer, replace_beer};
use crate::service::{absent_on_missing, ServiceResult};
use log::{debug, info, warn};

/// Raw list parameters as received from the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerListQuery {
    /// Case-insensitive name substring; blank counts as absent.
    pub name: Option<String>,
    pub style: Option<BeerStyle>,
    /// `Some(false)` hides `quantity_on_hand`; absent keeps it.
    pub show_inventory: Option<bool>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

/// Beer service facade over repository implementations.
pub struct BeerService<R: BeerRepository> {
    repo: R,
}

impl<R: BeerRepository> BeerService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists beers sorted by name using the filter selected from `query`.
    pub fn list_beers(&self, query: &BeerListQuery) -> ServiceResult<Page<Beer>> {
        let page = PageRequest::normalize(query.page_number, query.page_size);
        let filter = BeerFilter::resolve(query.name.as_deref(), query.style);

        let result = match &filter {
            BeerFilter::NameContainsAndStyle(name, style) => {
                self.repo.find_by_name_like_and_style(name, *style, &page)?
            }
            BeerFilter::NameContains(name) => self.repo.find_by_name_like(name, &page)?,
            BeerFilter::Style(style) => self.repo.find_by_style(*style, &page)?,
            BeerFilter::All => self.repo.find_all(&page)?,
        };

        debug!(
            "event=beer_list module=service status=ok filter={} page={} size={} returned={} total={}",
            filter_label(&filter),
            page.page_number(),
            page.page_size(),
            result.items.len(),
            result.total_elements
        );
        Ok(project_inventory(result, query.show_inventory))
    }

    pub fn get_beer(&self, id: BeerId) -> ServiceResult<Option<Beer>> {
        Ok(self.repo.find_by_id(id)?)
    }

    /// Creates a beer with server-assigned identity, version and timestamps.
    ///
    /// No duplicate detection by name or UPC is performed.
    pub fn create_beer(&self, input: &BeerInput) -> ServiceResult<Beer> {
        let draft = input.validate().inspect_err(|errors| {
            warn!(
                "event=beer_create module=service status=invalid violations={}",
                errors.violations().len()
            );
        })?;

        let saved = self.repo.save(&Beer::new(draft))?;
        info!(
            "event=beer_create module=service status=ok id={} version={}",
            saved.id, saved.version
        );
        Ok(saved)
    }

    /// Replaces every business field of an existing beer.
    ///
    /// Returns `Ok(None)` when no beer has `id`; nothing is written then.
    pub fn replace_beer(&self, id: BeerId, input: &BeerInput) -> ServiceResult<Option<Beer>> {
        let draft = input.validate()?;
        let Some(mut existing) = self.repo.find_by_id(id)? else {
            info!("event=beer_replace module=service status=not_found id={id}");
            return Ok(None);
        };

        replace_beer(&mut existing, draft);
        let saved = absent_on_missing(self.repo.save(&existing))?;
        log_write("beer_replace", id, saved.as_ref().map(|beer| beer.version));
        Ok(saved)
    }

    /// Merges the present, non-blank fields of `input` into an existing beer.
    pub fn patch_beer(&self, id: BeerId, input: &BeerInput) -> ServiceResult<Option<Beer>> {
        input.validate_patch()?;
        let Some(mut existing) = self.repo.find_by_id(id)? else {
            info!("event=beer_patch module=service status=not_found id={id}");
            return Ok(None);
        };

        patch_beer(&mut existing, input);
        let saved = absent_on_missing(self.repo.save(&existing))?;
        log_write("beer_patch", id, saved.as_ref().map(|beer| beer.version));
        Ok(saved)
    }

    /// Deletes a beer; returns whether a row was actually removed.
    pub fn delete_beer(&self, id: BeerId) -> ServiceResult<bool> {
        if !self.repo.exists_by_id(id)? {
            info!("event=beer_delete module=service status=not_found id={id}");
            return Ok(false);
        }
        let removed = absent_on_missing(self.repo.delete_by_id(id))?.is_some();
        info!("event=beer_delete module=service status=ok id={id} removed={removed}");
        Ok(removed)
    }

    pub fn count_beers(&self) -> ServiceResult<u64> {
        Ok(self.repo.count()?)
    }
}

fn filter_label(filter: &BeerFilter) -> &'static str {
    match filter {
        BeerFilter::All => "all",
        BeerFilter::NameContains(_) => "name",
        BeerFilter::Style(_) => "style",
        BeerFilter::NameContainsAndStyle(_, _) => "name_style",
    }
}

fn log_write(event: &str, id: BeerId, version: Option<u32>) {
    match version {
        Some(version) => {
            info!("event={event} module=service status=ok id={id} version={version}")
        }
        None => info!("event={event} module=service status=not_found id={id} stage=write"),
    }
}
