//! Starter data for empty stores.
//!
//! # Invariants
//! - Each resource is seeded only while its store is empty, so repeated runs
//!   never duplicate rows.

use crate::model::beer::{BeerInput, BeerStyle};
use crate::model::customer::CustomerInput;
use crate::model::money::Price;
use crate::repo::beer_repo::BeerRepository;
use crate::repo::customer_repo::CustomerRepository;
use crate::service::beer_service::BeerService;
use crate::service::customer_service::CustomerService;
use crate::service::ServiceResult;
use log::info;

const STARTER_BEERS: [(&str, BeerStyle, &str, i64, i32); 3] = [
    ("Galaxy Cat", BeerStyle::PaleAle, "123456", 1299, 122),
    ("Crank", BeerStyle::PaleAle, "123456222", 1199, 392),
    ("Sunshine City", BeerStyle::Ipa, "123456789", 1199, 553),
];

const STARTER_CUSTOMERS: [&str; 2] = ["Arin Hanson", "Dan Avidan"];

/// Rows inserted by one `seed_data` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub beers_created: usize,
    pub customers_created: usize,
}

pub fn seed_data<B: BeerRepository, C: CustomerRepository>(
    beers: &BeerService<B>,
    customers: &CustomerService<C>,
) -> ServiceResult<SeedReport> {
    let mut report = SeedReport::default();

    if beers.count_beers()? == 0 {
        for (name, style, upc, cents, quantity) in STARTER_BEERS {
            beers.create_beer(&BeerInput {
                name: Some(name.to_string()),
                style: Some(style),
                upc: Some(upc.to_string()),
                quantity_on_hand: Some(quantity),
                price: Some(Price::from_cents(cents)),
                ..BeerInput::default()
            })?;
            report.beers_created += 1;
        }
    }

    if customers.count_customers()? == 0 {
        for name in STARTER_CUSTOMERS {
            customers.create_customer(&CustomerInput {
                name: Some(name.to_string()),
                ..CustomerInput::default()
            })?;
            report.customers_created += 1;
        }
    }

    info!(
        "event=seed_data module=seed status=ok beers_created={} customers_created={}",
        report.beers_created, report.customers_created
    );
    Ok(report)
}
