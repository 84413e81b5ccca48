use catalog_core::{
    JsonCatalogStore, NewProduct, Product, ProductPatch, ProductRepository, ProductService,
    RepoError,
};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn temp_store() -> (TempDir, JsonCatalogStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCatalogStore::new(dir.path().join("products.json"));
    (dir, store)
}

fn input(code: &str) -> NewProduct {
    NewProduct::new(
        "producto prueba",
        "Este es un producto prueba",
        200.0,
        "Sin imagen",
        code,
        25,
    )
}

fn catalog_path(store: &JsonCatalogStore) -> PathBuf {
    store.path().unwrap().to_path_buf()
}

#[test]
fn empty_store_lists_nothing_and_creates_no_file() {
    let (_dir, store) = temp_store();

    assert!(store.list_products().unwrap().is_empty());
    assert!(!catalog_path(&store).exists());
}

#[test]
fn create_assigns_sequential_ids_and_persists() {
    let (_dir, store) = temp_store();

    let first = store.create_product(&input("abc123")).unwrap();
    let second = store.create_product(&input("xyz123")).unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    let reopened = JsonCatalogStore::new(catalog_path(&store));
    let products = reopened.list_products().unwrap();
    assert_eq!(products, vec![first, second]);
}

#[test]
fn distinct_codes_give_unique_positive_ids() {
    let (_dir, store) = temp_store();

    for index in 0..10 {
        store.create_product(&input(&format!("code-{index}"))).unwrap();
    }

    let products = store.list_products().unwrap();
    assert_eq!(products.len(), 10);
    let ids: HashSet<_> = products.iter().map(|product| product.id).collect();
    assert_eq!(ids.len(), 10);
    assert!(ids.iter().all(|id| *id > 0));
}

#[test]
fn duplicate_code_leaves_catalog_unchanged() {
    let (_dir, store) = temp_store();
    store.create_product(&input("abc123")).unwrap();
    let before = fs::read_to_string(catalog_path(&store)).unwrap();

    let err = store.create_product(&input("abc123")).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateCode(ref code) if code == "abc123"));

    let after = fs::read_to_string(catalog_path(&store)).unwrap();
    assert_eq!(before, after);
    assert_eq!(store.list_products().unwrap().len(), 1);
}

#[test]
fn ids_stay_unique_after_deleting_the_tail() {
    let (_dir, store) = temp_store();
    store.create_product(&input("a")).unwrap();
    store.create_product(&input("b")).unwrap();
    store.create_product(&input("c")).unwrap();

    store.delete_product(1).unwrap();
    store.delete_product(3).unwrap();
    let next = store.create_product(&input("d")).unwrap();
    assert_eq!(next.id, 3);

    // Reordered file: higher id before the tail.
    let path = catalog_path(&store);
    let mut products = store.list_products().unwrap();
    products.reverse();
    store.save(&products).unwrap();
    let after_reorder = store.create_product(&input("e")).unwrap();
    assert_eq!(after_reorder.id, 4);

    let ids: HashSet<_> = JsonCatalogStore::new(path)
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.id)
        .collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn get_returns_matching_record_or_none() {
    let (_dir, store) = temp_store();
    let created = store.create_product(&input("abc123")).unwrap();

    let loaded = store.get_product(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert!(store.get_product(5).unwrap().is_none());
}

#[test]
fn update_merges_fields_and_ignores_id() {
    let (_dir, store) = temp_store();
    store.create_product(&input("abc123")).unwrap();
    let original = store.create_product(&input("xyz123")).unwrap();

    let patch = ProductPatch {
        id: Some(9),
        title: Some("X".to_string()),
        price: Some(150.0),
        ..ProductPatch::default()
    };
    let updated = store.update_product(2, &patch).unwrap();
    assert!(updated.id_discarded);
    assert_eq!(updated.product.id, 2);

    let loaded = store.get_product(2).unwrap().unwrap();
    assert_eq!(loaded.title, "X");
    assert_eq!(loaded.price, 150.0);
    assert_eq!(loaded.description, original.description);
    assert_eq!(loaded.code, original.code);
    assert_eq!(loaded.stock, original.stock);
    assert!(store.get_product(9).unwrap().is_none());
}

#[test]
fn update_keeps_record_position() {
    let (_dir, store) = temp_store();
    store.create_product(&input("a")).unwrap();
    store.create_product(&input("b")).unwrap();
    store.create_product(&input("c")).unwrap();

    let patch = ProductPatch {
        stock: Some(0),
        ..ProductPatch::default()
    };
    store.update_product(2, &patch).unwrap();

    let ids: Vec<_> = store
        .list_products()
        .unwrap()
        .iter()
        .map(|product| product.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn update_not_found_returns_not_found() {
    let (_dir, store) = temp_store();
    store.create_product(&input("abc123")).unwrap();
    let before = store.list_products().unwrap();

    let patch = ProductPatch {
        title: Some("X".to_string()),
        ..ProductPatch::default()
    };
    let err = store.update_product(42, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(42)));
    assert_eq!(store.list_products().unwrap(), before);
}

#[test]
fn update_rejects_code_owned_by_another_product() {
    let (_dir, store) = temp_store();
    store.create_product(&input("abc123")).unwrap();
    store.create_product(&input("xyz123")).unwrap();

    let steal = ProductPatch {
        code: Some("abc123".to_string()),
        ..ProductPatch::default()
    };
    let err = store.update_product(2, &steal).unwrap_err();
    assert!(matches!(err, RepoError::DuplicateCode(_)));

    let keep_own = ProductPatch {
        code: Some("xyz123".to_string()),
        title: Some("same code".to_string()),
        ..ProductPatch::default()
    };
    store.update_product(2, &keep_own).unwrap();
    assert_eq!(store.get_product(2).unwrap().unwrap().title, "same code");
}

#[test]
fn delete_removes_exactly_one_record() {
    let (_dir, store) = temp_store();
    store.create_product(&input("abc123")).unwrap();
    let survivor = store.create_product(&input("xyz123")).unwrap();

    let removed = store.delete_product(1).unwrap();
    assert_eq!(removed.code, "abc123");
    assert_eq!(store.list_products().unwrap(), vec![survivor.clone()]);

    let err = store.delete_product(8).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(8)));
    assert_eq!(store.list_products().unwrap(), vec![survivor]);
}

#[test]
fn save_then_load_roundtrips_and_uses_two_space_indent() {
    let (_dir, store) = temp_store();
    let products = vec![
        Product::from_new(4, &input("d")),
        Product::from_new(1, &input("a")),
    ];

    store.save(&products).unwrap();
    assert_eq!(store.load().unwrap(), products);

    let text = fs::read_to_string(catalog_path(&store)).unwrap();
    assert!(text.starts_with("[\n  {\n    \"id\": 4,"));
    assert!(!catalog_path(&store).with_file_name("products.json.tmp").exists());
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonCatalogStore::new(dir.path().join("nested/data/products.json"));

    store.create_product(&input("abc123")).unwrap();
    assert_eq!(store.list_products().unwrap().len(), 1);
}

#[test]
fn invalid_file_is_a_parse_error_for_reads() {
    let (_dir, store) = temp_store();
    fs::write(catalog_path(&store), "not json").unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(err, RepoError::Parse { .. }));
    assert!(store.load_or_empty().is_empty());
    assert!(store.get_product(1).is_err());
}

#[test]
fn invalid_file_is_treated_as_empty_by_mutations() {
    let (_dir, store) = temp_store();
    fs::write(catalog_path(&store), "{\"broken\": true}").unwrap();

    let created = store.create_product(&input("abc123")).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(store.list_products().unwrap(), vec![created]);
}

#[test]
fn unwritable_path_reports_io_error_and_keeps_file_state() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "plain file").unwrap();
    let store = JsonCatalogStore::new(blocker.join("products.json"));

    let err = store.create_product(&input("abc123")).unwrap_err();
    assert!(matches!(err, RepoError::Io { .. }));
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "plain file");
}

#[test]
fn unbacked_store_reads_empty_and_fails_writes() {
    let store = JsonCatalogStore::new("");

    assert!(store.list_products().unwrap().is_empty());
    let err = store.create_product(&input("abc123")).unwrap_err();
    assert!(matches!(err, RepoError::PathUnset));
    assert!(store.list_products().unwrap().is_empty());
}

#[test]
fn external_edits_are_seen_by_the_next_call() {
    let (_dir, store) = temp_store();
    store.create_product(&input("abc123")).unwrap();

    fs::write(catalog_path(&store), "[]").unwrap();
    assert!(store.get_product(1).unwrap().is_none());
    assert_eq!(store.create_product(&input("abc123")).unwrap().id, 1);
}

#[test]
fn service_walkthrough_matches_documented_scenario() {
    let (_dir, store) = temp_store();
    let service = ProductService::new(store);

    assert!(service.get_products().is_empty());

    let first = service.add_product(
        "producto prueba",
        "Este es un producto prueba",
        200.0,
        "Sin imagen",
        "abc123",
        25,
    );
    assert!(first.ok);
    assert_eq!(first.product_id, Some(1));

    let duplicate = service.add_product(
        "producto prueba",
        "Este es un producto prueba",
        200.0,
        "Sin imagen",
        "abc123",
        25,
    );
    assert!(!duplicate.ok);
    assert_eq!(duplicate.error_code, Some("duplicate_code"));
    assert_eq!(service.get_products().len(), 1);

    let second = service.add_product(
        "otro producto prueba",
        "Este es otro producto prueba",
        600.0,
        "Sin imagen",
        "xyz123",
        50,
    );
    assert_eq!(second.product_id, Some(2));
    assert_eq!(service.get_products().len(), 2);

    assert_eq!(service.get_product_by_id(1).unwrap().code, "abc123");
    assert!(service.get_product_by_id(5).is_none());

    let patch: ProductPatch =
        serde_json::from_value(serde_json::json!({ "title": "X", "id": 9 })).unwrap();
    let updated = service.update_product(2, &patch);
    assert!(updated.ok);
    assert!(updated.message.contains("ignored"));
    let product = service.get_product_by_id(2).unwrap();
    assert_eq!(product.id, 2);
    assert_eq!(product.title, "X");
    assert!(service.get_product_by_id(9).is_none());

    let deleted = service.delete_product(1);
    assert!(deleted.ok);
    let remaining = service.get_products();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].code, "xyz123");

    let missing = service.delete_product(8);
    assert!(!missing.ok);
    assert_eq!(missing.error_code, Some("not_found"));
    assert_eq!(missing.product_id, Some(8));
    assert_eq!(service.get_products(), remaining);
}

#[test]
fn service_degrades_read_failures_to_absence() {
    let (_dir, store) = temp_store();
    fs::write(catalog_path(&store), "[{\"id\": \"one\"}]").unwrap();
    let service = ProductService::new(store);

    assert!(service.get_products().is_empty());
    assert!(service.get_product_by_id(1).is_none());
}

#[test]
fn returned_products_are_copies() {
    let (_dir, store) = temp_store();
    let service = ProductService::new(store);
    service.create_product(&input("abc123"));

    let mut listed = service.get_products();
    listed[0].title = "mutated by caller".to_string();
    listed.clear();

    assert_eq!(
        service.get_product_by_id(1).unwrap().title,
        "producto prueba"
    );
    assert_eq!(service.repo().list_products().unwrap().len(), 1);
}

#[test]
fn create_rejects_non_finite_price_and_keeps_existing_products() {
    let (_dir, store) = temp_store();
    store.create_product(&input("a")).unwrap();
    store.create_product(&input("b")).unwrap();
    let before = fs::read_to_string(catalog_path(&store)).unwrap();

    for price in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
        let mut bad = input("c");
        bad.price = price;
        let err = store.create_product(&bad).unwrap_err();
        assert!(matches!(err, RepoError::InvalidPrice(_)));
        assert_eq!(err.code(), "invalid_price");
    }

    assert_eq!(fs::read_to_string(catalog_path(&store)).unwrap(), before);
    store.create_product(&input("c")).unwrap();
    let codes: Vec<_> = store
        .list_products()
        .unwrap()
        .into_iter()
        .map(|product| product.code)
        .collect();
    assert_eq!(codes, vec!["a", "b", "c"]);
}

#[test]
fn update_rejects_non_finite_price_and_keeps_record() {
    let (_dir, store) = temp_store();
    let created = store.create_product(&input("abc123")).unwrap();

    let patch = ProductPatch {
        price: Some(f64::NAN),
        title: Some("X".to_string()),
        ..ProductPatch::default()
    };
    let err = store.update_product(created.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::InvalidPrice(_)));

    assert_eq!(store.list_products().unwrap(), vec![created]);
}

#[test]
fn create_fails_when_max_id_is_taken() {
    let (_dir, store) = temp_store();
    store
        .save(&[Product::from_new(u64::MAX, &input("a"))])
        .unwrap();

    let err = store.create_product(&input("b")).unwrap_err();
    assert!(matches!(err, RepoError::IdSpaceExhausted));

    let products = store.list_products().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id, u64::MAX);
}

#[test]
fn id_only_update_leaves_file_untouched() {
    let (_dir, store) = temp_store();
    let created = Product::from_new(3, &input("abc123"));
    let compact = serde_json::to_string(&vec![created.clone()]).unwrap();
    fs::write(catalog_path(&store), &compact).unwrap();

    let patch = ProductPatch {
        id: Some(9),
        ..ProductPatch::default()
    };
    let updated = store.update_product(3, &patch).unwrap();
    assert!(updated.id_discarded);
    assert_eq!(updated.product, created);

    assert_eq!(fs::read_to_string(catalog_path(&store)).unwrap(), compact);
}

#[test]
fn service_reports_save_failure_in_response() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "plain file").unwrap();
    let service = ProductService::new(JsonCatalogStore::new(blocker.join("products.json")));

    let response = service.create_product(&input("abc123"));
    assert!(!response.ok);
    assert_eq!(response.product_id, None);
    assert_eq!(response.error_code, Some("io_failed"));
    assert!(!response.message.is_empty());

    let deleted = service.delete_product(1);
    assert_eq!(deleted.error_code, Some("not_found"));
    assert!(service.get_products().is_empty());
}
