use taproom_core::db::open_db_in_memory;
use taproom_core::{
    Beer, BeerInput, BeerListQuery, BeerRepository, BeerService, BeerStyle, MemoryBeerRepository,
    Price, RepoError, ServiceError, SqliteBeerRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn beer_input(name: &str, style: BeerStyle, quantity: Option<i32>) -> BeerInput {
    BeerInput {
        name: Some(name.to_string()),
        style: Some(style),
        upc: Some("123456".to_string()),
        quantity_on_hand: quantity,
        price: Some(Price::from_cents(1299)),
        ..BeerInput::default()
    }
}

fn seed_names<R: BeerRepository>(service: &BeerService<R>) {
    for (name, style) in [
        ("ipa", BeerStyle::Ipa),
        ("IPA Deluxe", BeerStyle::Ipa),
        ("Hazy Ipa", BeerStyle::PaleAle),
        ("Lager", BeerStyle::Lager),
    ] {
        service.create_beer(&beer_input(name, style, Some(10))).unwrap();
    }
}

fn names(beers: &[Beer]) -> Vec<&str> {
    beers.iter().map(|beer| beer.name.as_str()).collect()
}

#[test]
fn create_get_delete_end_to_end() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());

    let created = service
        .create_beer(&beer_input("Galaxy Cat", BeerStyle::PaleAle, Some(122)))
        .unwrap();
    let loaded = service.get_beer(created.id).unwrap().unwrap();

    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.name, "Galaxy Cat");
    assert_eq!(loaded.style, BeerStyle::PaleAle);
    assert_eq!(loaded.price, "12.99".parse::<Price>().unwrap());
    assert_eq!(loaded.quantity_on_hand, Some(122));
    assert!(loaded.created_at > 0);
    assert_eq!(loaded.created_at, loaded.updated_at);

    assert!(service.delete_beer(created.id).unwrap());
    assert!(service.get_beer(created.id).unwrap().is_none());
    assert!(!service.delete_beer(created.id).unwrap());
}

#[test]
fn create_ignores_client_supplied_server_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());

    let forged_id = Uuid::new_v4();
    let input = BeerInput {
        id: Some(forged_id),
        version: Some(42),
        created_at: Some(1),
        updated_at: Some(2),
        ..beer_input("Crank", BeerStyle::PaleAle, None)
    };
    let created = service.create_beer(&input).unwrap();

    assert_ne!(created.id, forged_id);
    assert_eq!(created.version, 1);
    assert!(created.created_at > 2);
}

#[test]
fn create_allows_duplicate_business_keys() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());

    let first = service.create_beer(&beer_input("Twin", BeerStyle::Ale, None)).unwrap();
    let second = service.create_beer(&beer_input("Twin", BeerStyle::Ale, None)).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(service.count_beers().unwrap(), 2);
}

#[test]
fn create_reports_all_violations() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());

    let err = service.create_beer(&BeerInput::default()).unwrap_err();
    match err {
        ServiceError::Validation(errors) => {
            assert_eq!(errors.violations().len(), 4);
            assert!(errors.has_field("name"));
            assert!(errors.has_field("price"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.count_beers().unwrap(), 0);
}

#[test]
fn name_filter_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    seed_names(&service);

    let page = service
        .list_beers(&BeerListQuery {
            name: Some("IPA".to_string()),
            ..BeerListQuery::default()
        })
        .unwrap();
    assert_eq!(names(&page.items), vec!["Hazy Ipa", "IPA Deluxe", "ipa"]);
    assert_eq!(page.total_elements, 3);
}

#[test]
fn style_and_combined_filters_select_expected_rows() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    seed_names(&service);

    let by_style = service
        .list_beers(&BeerListQuery {
            style: Some(BeerStyle::Ipa),
            ..BeerListQuery::default()
        })
        .unwrap();
    assert_eq!(names(&by_style.items), vec!["IPA Deluxe", "ipa"]);

    let combined = service
        .list_beers(&BeerListQuery {
            name: Some("ipa".to_string()),
            style: Some(BeerStyle::PaleAle),
            ..BeerListQuery::default()
        })
        .unwrap();
    assert_eq!(names(&combined.items), vec!["Hazy Ipa"]);

    let all = service.list_beers(&BeerListQuery::default()).unwrap();
    assert_eq!(all.total_elements, 4);
    assert_eq!(all.page_size, 25);
}

#[test]
fn list_paginates_in_name_order() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    seed_names(&service);

    let second = service
        .list_beers(&BeerListQuery {
            page_number: Some(1),
            page_size: Some(2),
            ..BeerListQuery::default()
        })
        .unwrap();
    assert_eq!(names(&second.items), vec!["Lager", "ipa"]);
    assert_eq!(second.page_number, 1);
    assert_eq!(second.total_pages(), 2);
}

#[test]
fn hidden_inventory_clears_quantity_without_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    seed_names(&service);

    let hidden = service
        .list_beers(&BeerListQuery {
            show_inventory: Some(false),
            ..BeerListQuery::default()
        })
        .unwrap();
    assert_eq!(hidden.items.len(), 4);
    for beer in &hidden.items {
        assert_eq!(beer.quantity_on_hand, None);
        assert!(!beer.name.is_empty());
        assert_eq!(beer.upc, "123456");
        assert_eq!(beer.price, Price::from_cents(1299));
    }

    let stored = service.get_beer(hidden.items[0].id).unwrap().unwrap();
    assert_eq!(stored.quantity_on_hand, Some(10));
}

#[test]
fn patch_merges_non_blank_fields_and_bumps_version() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let created = service
        .create_beer(&beer_input("Galaxy Cat", BeerStyle::PaleAle, Some(122)))
        .unwrap();

    let blank = BeerInput {
        name: Some("   ".to_string()),
        ..BeerInput::default()
    };
    let after_blank = service.patch_beer(created.id, &blank).unwrap().unwrap();
    assert_eq!(after_blank.name, "Galaxy Cat");
    assert_eq!(after_blank.version, 2);

    let rename = BeerInput {
        name: Some("X".to_string()),
        ..BeerInput::default()
    };
    let once = service.patch_beer(created.id, &rename).unwrap().unwrap();
    let twice = service.patch_beer(created.id, &rename).unwrap().unwrap();
    assert_eq!(once.name, "X");
    assert_eq!(twice.name, "X");
    assert_eq!(twice.quantity_on_hand, once.quantity_on_hand);
    assert_eq!(twice.id, created.id);
    assert!(twice.version > once.version);
    assert!(twice.updated_at > once.updated_at);
    assert_eq!(twice.created_at, created.created_at);
}

#[test]
fn replace_treats_omission_as_clear() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let created = service
        .create_beer(&beer_input("Galaxy Cat", BeerStyle::PaleAle, Some(122)))
        .unwrap();

    let replaced = service
        .replace_beer(
            created.id,
            &BeerInput {
                version: Some(99),
                ..beer_input("Crank", BeerStyle::Lager, None)
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.name, "Crank");
    assert_eq!(replaced.style, BeerStyle::Lager);
    assert_eq!(replaced.quantity_on_hand, None);
    assert_eq!(replaced.version, 2);
    assert_eq!(replaced.created_at, created.created_at);
}

#[test]
fn mutations_on_missing_ids_report_absent() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let missing = Uuid::new_v4();

    assert!(service.get_beer(missing).unwrap().is_none());
    assert!(service
        .replace_beer(missing, &beer_input("Ghost", BeerStyle::Gose, None))
        .unwrap()
        .is_none());
    assert!(service
        .patch_beer(missing, &beer_input("Ghost", BeerStyle::Gose, None))
        .unwrap()
        .is_none());
    assert!(!service.delete_beer(missing).unwrap());
    assert_eq!(service.count_beers().unwrap(), 0);
}

#[test]
fn patch_rejects_invalid_present_values() {
    let conn = open_db_in_memory().unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let created = service
        .create_beer(&beer_input("Galaxy Cat", BeerStyle::PaleAle, Some(1)))
        .unwrap();

    let err = service
        .patch_beer(
            created.id,
            &BeerInput {
                quantity_on_hand: Some(-3),
                ..BeerInput::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    assert_eq!(service.get_beer(created.id).unwrap().unwrap().version, 1);
}

#[test]
fn stale_snapshot_save_is_a_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeerRepository::try_new(&conn).unwrap();
    let service = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());

    let created = service
        .create_beer(&beer_input("Galaxy Cat", BeerStyle::PaleAle, Some(1)))
        .unwrap();
    let stale = repo.find_by_id(created.id).unwrap().unwrap();

    service
        .patch_beer(
            created.id,
            &BeerInput {
                upc: Some("777".to_string()),
                ..BeerInput::default()
            },
        )
        .unwrap();

    let err = repo.save(&stale).unwrap_err();
    assert!(matches!(
        err,
        RepoError::VersionConflict { id, expected_version: 1 } if id == created.id
    ));
    assert_eq!(
        ServiceError::from(err).to_string(),
        format!("record {} changed since version 1; reload and retry", created.id)
    );
}

#[test]
fn saving_a_deleted_snapshot_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBeerRepository::try_new(&conn).unwrap();
    let saved = repo
        .save(&Beer::new(beer_input("Crank", BeerStyle::Ale, None).validate().unwrap()))
        .unwrap();
    repo.delete_by_id(saved.id).unwrap();

    let err = repo.save(&saved).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == saved.id));
}

#[test]
fn memory_and_sqlite_providers_agree_on_filters() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let memory = BeerService::new(MemoryBeerRepository::new());
    seed_names(&sqlite);
    seed_names(&memory);

    let queries = [
        BeerListQuery::default(),
        BeerListQuery {
            name: Some("iPa".to_string()),
            ..BeerListQuery::default()
        },
        BeerListQuery {
            style: Some(BeerStyle::Ipa),
            page_size: Some(1),
            page_number: Some(1),
            ..BeerListQuery::default()
        },
    ];
    for query in &queries {
        let from_sqlite = sqlite.list_beers(query).unwrap();
        let from_memory = memory.list_beers(query).unwrap();
        assert_eq!(names(&from_sqlite.items), names(&from_memory.items));
        assert_eq!(from_sqlite.total_elements, from_memory.total_elements);
    }
}

#[test]
fn name_filter_folds_non_ascii_case_in_both_providers() {
    let conn = open_db_in_memory().unwrap();
    let sqlite = BeerService::new(SqliteBeerRepository::try_new(&conn).unwrap());
    let memory = BeerService::new(MemoryBeerRepository::new());
    for (name, style) in [
        ("Münchner Hell", BeerStyle::Lager),
        ("Munchner Dunkel", BeerStyle::Lager),
    ] {
        let input = beer_input(name, style, None);
        sqlite.create_beer(&input).unwrap();
        memory.create_beer(&input).unwrap();
    }

    for needle in ["MÜNCHNER", "münchner", "ÜNCH"] {
        let query = BeerListQuery {
            name: Some(needle.to_string()),
            ..BeerListQuery::default()
        };
        let from_sqlite = sqlite.list_beers(&query).unwrap();
        let from_memory = memory.list_beers(&query).unwrap();
        assert_eq!(names(&from_sqlite.items), vec!["Münchner Hell"], "needle {needle}");
        assert_eq!(names(&from_memory.items), vec!["Münchner Hell"], "needle {needle}");
    }

    let with_style = BeerListQuery {
        name: Some("MÜNCHNER".to_string()),
        style: Some(BeerStyle::Lager),
        ..BeerListQuery::default()
    };
    assert_eq!(sqlite.list_beers(&with_style).unwrap().total_elements, 1);
    assert_eq!(memory.list_beers(&with_style).unwrap().total_elements, 1);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteBeerRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            actual_version: 0, ..
        }) => {}
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("uninitialized connection must be rejected"),
    }
}
