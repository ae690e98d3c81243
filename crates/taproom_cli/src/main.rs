//! CLI entry point.
//!
//! # Responsibility
//! - Resolve configuration from the environment and start logging if asked.
//! - Seed empty stores and print a deterministic catalog summary.
//!
//! Usage: `taproom_cli [summary|beers|customers] [name-filter]`

use std::process::ExitCode;
use taproom_api::{
    with_beer_api, with_customer_api, ApiConfig, ApiResponse, BeerListParams, CustomerListParams,
};
use taproom_core::db::open_db;
use taproom_core::{
    seed_data, BeerService, CustomerService, SqliteBeerRepository, SqliteCustomerRepository,
};

fn main() -> ExitCode {
    let config = ApiConfig::from_env();
    if let Err(err) = taproom_api::init_logging(&config) {
        eprintln!("taproom: logging disabled: {err}");
    }

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "summary".to_string());
    let name = args.next();

    let outcome = match command.as_str() {
        "summary" => summary(&config),
        "beers" => print_response(with_beer_api(&config.db_path, |api| {
            api.list(&BeerListParams {
                name,
                ..BeerListParams::default()
            })
        })),
        "customers" => print_response(with_customer_api(&config.db_path, |api| {
            api.list(&CustomerListParams {
                name,
                ..CustomerListParams::default()
            })
        })),
        other => Err(format!(
            "unknown command `{other}`; expected summary|beers|customers"
        )),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taproom: {err}");
            ExitCode::FAILURE
        }
    }
}

fn summary(config: &ApiConfig) -> Result<(), String> {
    let conn = open_db(&config.db_path).map_err(|err| format!("db open failed: {err}"))?;
    let beers = BeerService::new(
        SqliteBeerRepository::try_new(&conn).map_err(|err| format!("repo init failed: {err}"))?,
    );
    let customers = CustomerService::new(
        SqliteCustomerRepository::try_new(&conn)
            .map_err(|err| format!("repo init failed: {err}"))?,
    );

    let report = seed_data(&beers, &customers).map_err(|err| err.to_string())?;
    println!("taproom db={}", config.db_path.display());
    println!(
        "taproom seeded beers={} customers={}",
        report.beers_created, report.customers_created
    );
    println!(
        "taproom totals beers={} customers={}",
        beers.count_beers().map_err(|err| err.to_string())?,
        customers.count_customers().map_err(|err| err.to_string())?
    );
    println!("taproom_core version={}", taproom_core::core_version());
    Ok(())
}

fn print_response(response: ApiResponse) -> Result<(), String> {
    let body = response
        .body
        .as_ref()
        .map(|body| body.to_string())
        .unwrap_or_default();
    if response.is_success() {
        println!("{body}");
        Ok(())
    } else {
        Err(format!("status={} {body}", response.status))
    }
}
