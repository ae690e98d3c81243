use taproom_core::db::open_db_in_memory;
use taproom_core::{
    seed_data, BeerListQuery, BeerService, BeerStyle, CustomerInput, CustomerListQuery,
    CustomerService, MemoryBeerRepository, MemoryCustomerRepository, Price, SeedReport,
    SqliteBeerRepository, SqliteCustomerRepository,
};

#[test]
fn seed_populates_empty_stores_once() {
    let conn = open_db_in_memory().unwrap();
    let beers = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let customers = CustomerService::new(SqliteCustomerRepository::try_new(&conn).unwrap());

    let first = seed_data(&beers, &customers).unwrap();
    assert_eq!(
        first,
        SeedReport {
            beers_created: 3,
            customers_created: 2,
        }
    );

    let second = seed_data(&beers, &customers).unwrap();
    assert_eq!(second, SeedReport::default());
    assert_eq!(beers.count_beers().unwrap(), 3);
    assert_eq!(customers.count_customers().unwrap(), 2);
}

#[test]
fn seeded_catalog_contains_starter_beers() {
    let beers = BeerService::new(MemoryBeerRepository::new());
    let customers = CustomerService::new(MemoryCustomerRepository::new());
    seed_data(&beers, &customers).unwrap();

    let page = beers.list_beers(&BeerListQuery::default()).unwrap();
    let galaxy = page
        .items
        .iter()
        .find(|beer| beer.name == "Galaxy Cat")
        .unwrap();
    assert_eq!(galaxy.style, BeerStyle::PaleAle);
    assert_eq!(galaxy.price, Price::from_cents(1299));
    assert_eq!(galaxy.quantity_on_hand, Some(122));

    let ipas = beers
        .list_beers(&BeerListQuery {
            style: Some(BeerStyle::Ipa),
            ..BeerListQuery::default()
        })
        .unwrap();
    assert_eq!(ipas.items.len(), 1);
    assert_eq!(ipas.items[0].name, "Sunshine City");
}

#[test]
fn seed_skips_non_empty_stores_independently() {
    let beers = BeerService::new(MemoryBeerRepository::new());
    let customers = CustomerService::new(MemoryCustomerRepository::new());
    customers
        .create_customer(&CustomerInput {
            name: Some("Existing".to_string()),
            ..CustomerInput::default()
        })
        .unwrap();

    let report = seed_data(&beers, &customers).unwrap();
    assert_eq!(report.beers_created, 3);
    assert_eq!(report.customers_created, 0);

    let listed = customers
        .list_customers(&CustomerListQuery::default())
        .unwrap();
    assert_eq!(listed.items.len(), 1);
}
