//! Boundary handlers for the beer and customer resources.
//!
//! # Responsibility
//! - Parse raw path ids, query values and JSON bodies.
//! - Call one service operation and shape its outcome as an `ApiResponse`.
//!
//! # Invariants
//! - Handlers never panic; every failure maps to a status code.
//! - Create answers with a `Location` under the resource's base path.
//! - Replace, patch and delete answer without a body.

use crate::response::{ApiError, ApiResponse, STATUS_INTERNAL_ERROR};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use taproom_core::db::open_db;
use taproom_core::{
    BeerInput, BeerListQuery, BeerRepository, BeerService, BeerStyle, CustomerInput,
    CustomerListQuery, CustomerRepository, CustomerService, SqliteBeerRepository,
    SqliteCustomerRepository,
};
use uuid::Uuid;

pub const BEER_PATH: &str = "/api/v1/beer";
pub const CUSTOMER_PATH: &str = "/api/v1/customer";

/// Raw beer list parameters as they arrive on a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeerListParams {
    pub name: Option<String>,
    /// Style text in any letter case; blank counts as absent.
    pub style: Option<String>,
    pub show_inventory: Option<bool>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerListParams {
    pub name: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

pub struct BeerApi<R: BeerRepository> {
    service: BeerService<R>,
}

impl<R: BeerRepository> BeerApi<R> {
    pub fn new(service: BeerService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &BeerService<R> {
        &self.service
    }

    /// `GET /api/v1/beer`
    pub fn list(&self, params: &BeerListParams) -> ApiResponse {
        respond("beer_list", self.try_list(params))
    }

    /// `GET /api/v1/beer/{id}`
    pub fn get(&self, id: &str) -> ApiResponse {
        respond("beer_get", self.try_get(id))
    }

    /// `POST /api/v1/beer`
    pub fn create(&self, body: &str) -> ApiResponse {
        respond("beer_create", self.try_create(body))
    }

    /// `PUT /api/v1/beer/{id}`
    pub fn replace(&self, id: &str, body: &str) -> ApiResponse {
        respond("beer_replace", self.try_replace(id, body))
    }

    /// `PATCH /api/v1/beer/{id}`
    pub fn patch(&self, id: &str, body: &str) -> ApiResponse {
        respond("beer_patch", self.try_patch(id, body))
    }

    /// `DELETE /api/v1/beer/{id}`
    pub fn delete(&self, id: &str) -> ApiResponse {
        respond("beer_delete", self.try_delete(id))
    }

    fn try_list(&self, params: &BeerListParams) -> Result<ApiResponse, ApiError> {
        let style = match params.style.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(raw.parse::<BeerStyle>()?),
            _ => None,
        };
        let page = self.service.list_beers(&BeerListQuery {
            name: params.name.clone(),
            style,
            show_inventory: params.show_inventory,
            page_number: params.page_number,
            page_size: params.page_size,
        })?;
        Ok(ApiResponse::ok(render(&page)?))
    }

    fn try_get(&self, id: &str) -> Result<ApiResponse, ApiError> {
        match self.service.get_beer(parse_id(id)?)? {
            Some(beer) => Ok(ApiResponse::ok(render(&beer)?)),
            None => Ok(ApiResponse::not_found()),
        }
    }

    fn try_create(&self, body: &str) -> Result<ApiResponse, ApiError> {
        let input: BeerInput = parse_body(body)?;
        let saved = self.service.create_beer(&input)?;
        Ok(ApiResponse::created(format!("{BEER_PATH}/{}", saved.id)))
    }

    fn try_replace(&self, id: &str, body: &str) -> Result<ApiResponse, ApiError> {
        let id = parse_id(id)?;
        let input: BeerInput = parse_body(body)?;
        Ok(empty_or_missing(self.service.replace_beer(id, &input)?.is_some()))
    }

    fn try_patch(&self, id: &str, body: &str) -> Result<ApiResponse, ApiError> {
        let id = parse_id(id)?;
        let input: BeerInput = parse_body(body)?;
        Ok(empty_or_missing(self.service.patch_beer(id, &input)?.is_some()))
    }

    fn try_delete(&self, id: &str) -> Result<ApiResponse, ApiError> {
        Ok(empty_or_missing(self.service.delete_beer(parse_id(id)?)?))
    }
}

pub struct CustomerApi<R: CustomerRepository> {
    service: CustomerService<R>,
}

impl<R: CustomerRepository> CustomerApi<R> {
    pub fn new(service: CustomerService<R>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CustomerService<R> {
        &self.service
    }

    pub fn list(&self, params: &CustomerListParams) -> ApiResponse {
        respond("customer_list", self.try_list(params))
    }

    pub fn get(&self, id: &str) -> ApiResponse {
        respond("customer_get", self.try_get(id))
    }

    pub fn create(&self, body: &str) -> ApiResponse {
        respond("customer_create", self.try_create(body))
    }

    pub fn replace(&self, id: &str, body: &str) -> ApiResponse {
        respond("customer_replace", self.try_replace(id, body))
    }

    pub fn patch(&self, id: &str, body: &str) -> ApiResponse {
        respond("customer_patch", self.try_patch(id, body))
    }

    pub fn delete(&self, id: &str) -> ApiResponse {
        respond("customer_delete", self.try_delete(id))
    }

    fn try_list(&self, params: &CustomerListParams) -> Result<ApiResponse, ApiError> {
        let page = self.service.list_customers(&CustomerListQuery {
            name: params.name.clone(),
            page_number: params.page_number,
            page_size: params.page_size,
        })?;
        Ok(ApiResponse::ok(render(&page)?))
    }

    fn try_get(&self, id: &str) -> Result<ApiResponse, ApiError> {
        match self.service.get_customer(parse_id(id)?)? {
            Some(customer) => Ok(ApiResponse::ok(render(&customer)?)),
            None => Ok(ApiResponse::not_found()),
        }
    }

    fn try_create(&self, body: &str) -> Result<ApiResponse, ApiError> {
        let input: CustomerInput = parse_body(body)?;
        let saved = self.service.create_customer(&input)?;
        Ok(ApiResponse::created(format!("{CUSTOMER_PATH}/{}", saved.id)))
    }

    fn try_replace(&self, id: &str, body: &str) -> Result<ApiResponse, ApiError> {
        let id = parse_id(id)?;
        let input: CustomerInput = parse_body(body)?;
        Ok(empty_or_missing(
            self.service.replace_customer(id, &input)?.is_some(),
        ))
    }

    fn try_patch(&self, id: &str, body: &str) -> Result<ApiResponse, ApiError> {
        let id = parse_id(id)?;
        let input: CustomerInput = parse_body(body)?;
        Ok(empty_or_missing(
            self.service.patch_customer(id, &input)?.is_some(),
        ))
    }

    fn try_delete(&self, id: &str) -> Result<ApiResponse, ApiError> {
        Ok(empty_or_missing(
            self.service.delete_customer(parse_id(id)?)?,
        ))
    }
}

/// Opens the database at `db_path`, runs `f` against a SQLite-backed beer
/// API and closes the connection again.
pub fn with_beer_api(
    db_path: &Path,
    f: impl FnOnce(&BeerApi<SqliteBeerRepository<'_>>) -> ApiResponse,
) -> ApiResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return respond("beer_open", Err(err.into())),
    };
    match SqliteBeerRepository::try_new(&conn) {
        Ok(repo) => f(&BeerApi::new(BeerService::new(repo))),
        Err(err) => respond("beer_open", Err(ApiError::Storage(err.to_string()))),
    }
}

/// Customer counterpart of [`with_beer_api`].
pub fn with_customer_api(
    db_path: &Path,
    f: impl FnOnce(&CustomerApi<SqliteCustomerRepository<'_>>) -> ApiResponse,
) -> ApiResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return respond("customer_open", Err(err.into())),
    };
    match SqliteCustomerRepository::try_new(&conn) {
        Ok(repo) => f(&CustomerApi::new(CustomerService::new(repo))),
        Err(err) => respond("customer_open", Err(ApiError::Storage(err.to_string()))),
    }
}

fn respond(event: &'static str, outcome: Result<ApiResponse, ApiError>) -> ApiResponse {
    match outcome {
        Ok(response) => response,
        Err(err) => {
            let code = err.status();
            if code >= STATUS_INTERNAL_ERROR {
                error!("event={event} module=api status=error code={code} error={err}");
            } else {
                warn!("event={event} module=api status=rejected code={code}");
            }
            ApiResponse::from(err)
        }
    }
}

fn empty_or_missing(found: bool) -> ApiResponse {
    if found {
        ApiResponse::no_content()
    } else {
        ApiResponse::not_found()
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(ApiError::MalformedBody)
}

fn render<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(ApiError::Render)
}
