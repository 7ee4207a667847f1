//! Integration tests for the PostgreSQL record store.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup. They are ignored by default.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_record_store -- --ignored`

use farmer_search_repository::{PostgresRecordStore, RecordStore, RecordStoreError};
use farmer_search_shared::{
    store_key_string, Address, Farmer, GeoLocation, OpeningHours, Price, Product,
};
use sqlx::Row;
use uuid::Uuid;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Creates a test farmer with every optional field populated.
fn make_farmer(name: &str, grocery_types: &[&str]) -> Farmer {
    Farmer {
        rating: Some(4.6),
        grocery_types: strings(grocery_types),
        title_image: Some("/img/2l092834lskhsieo.svg".to_string()),
        address: Address {
            street: Some("Hauptstraße".to_string()),
            number: Some("1".to_string()),
            city: Some("Berlin".to_string()),
            zip_code: Some("10115".to_string()),
            country: Some("DE".to_string()),
        },
        features: strings(&["organic"]),
        opening_hours: OpeningHours::every_day(vec![[9 * 3600, 17 * 3600]]),
        ..Farmer::new(name, GeoLocation::new(13.404954, 52.520008))
    }
}

fn make_product(name: &str, grocery_type: &str) -> Product {
    Product {
        description: Some("Fresh from the field".to_string()),
        price: Price {
            value: Some(2.5),
            per_unit: Some("kg".to_string()),
        },
        ..Product::new(name, grocery_type)
    }
}

// ============================================================================
// Farmer Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_insert_and_find_farmer(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool.clone());
    let farmer = make_farmer("The local Farm <3", &["Potato", "Strawberry"]);

    let inserted = store.insert_farmer(farmer.clone()).await.unwrap();
    let key = inserted.key.expect("store assigns a key");

    let found = store
        .find_farmers_by_keys_and_types(&[store_key_string(&key)], &[])
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].key, Some(key));
    assert_eq!(found[0].name, farmer.name);
    assert_eq!(found[0].grocery_types, farmer.grocery_types);
    assert_eq!(found[0].address, farmer.address);
    assert_eq!(found[0].opening_hours, farmer.opening_hours);
    assert_eq!(found[0].location, farmer.location);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_find_farmers_subset_filter(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let berries = store
        .insert_farmer(make_farmer("Berry Farm", &["Potato", "Strawberry"]))
        .await
        .unwrap();
    let roots = store
        .insert_farmer(make_farmer("Root Farm", &["Potato"]))
        .await
        .unwrap();
    let keys = vec![
        store_key_string(&berries.key.unwrap()),
        store_key_string(&roots.key.unwrap()),
    ];

    let unfiltered = store.find_farmers_by_keys_and_types(&keys, &[]).await.unwrap();
    assert_eq!(unfiltered.len(), 2);

    let both = store
        .find_farmers_by_keys_and_types(&keys, &strings(&["Potato", "Strawberry"]))
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].key, berries.key);

    let none = store
        .find_farmers_by_keys_and_types(&keys, &strings(&["Kale"]))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_find_farmers_rejects_malformed_key(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let keys = vec![Uuid::new_v4().simple().to_string(), "not-a-key".to_string()];

    let result = store.find_farmers_by_keys_and_types(&keys, &[]).await;
    assert!(matches!(result, Err(RecordStoreError::InvalidArgument(_))));
}

// ============================================================================
// Product Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_insert_and_list_products(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let farmer = store
        .insert_farmer(make_farmer("Berry Farm", &[]))
        .await
        .unwrap();
    let farmer_key = farmer.key.unwrap();

    let inserted = store
        .insert_products(
            &farmer_key,
            vec![make_product("Kale", "Kale"), make_product("Carrots", "Carrot")],
        )
        .await
        .unwrap();

    assert_eq!(inserted.len(), 2);
    assert!(inserted.iter().all(|p| p.farmer_key == Some(farmer_key)));
    assert!(inserted.iter().all(|p| p.id.as_deref().unwrap().starts_with("p-")));

    let listed = store.find_products_by_farmer_key(&farmer_key).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].price, make_product("Kale", "Kale").price);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_insert_products_unknown_farmer_rolls_back(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool.clone());

    let result = store
        .insert_products(&Uuid::new_v4(), vec![make_product("Kale", "Kale")])
        .await;
    assert!(matches!(result, Err(RecordStoreError::FarmerNotFound(_))));

    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM products")
        .fetch_one(&pool)
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_union_grocery_types_is_idempotent(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let farmer = store
        .insert_farmer(make_farmer("Root Farm", &["Potato"]))
        .await
        .unwrap();
    let key = farmer.key.unwrap();
    let added = strings(&["Kale", "Potato"]);

    store.union_farmer_grocery_types(&key, &added).await.unwrap();
    store.union_farmer_grocery_types(&key, &added).await.unwrap();

    let found = store
        .find_farmers_by_keys_and_types(&[store_key_string(&key)], &[])
        .await
        .unwrap();
    assert_eq!(found[0].grocery_types, strings(&["Kale", "Potato"]));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_union_grocery_types_unknown_farmer(pool: sqlx::PgPool) {
    let store = PostgresRecordStore::new(pool);
    let result = store
        .union_farmer_grocery_types(&Uuid::new_v4(), &strings(&["Kale"]))
        .await;
    assert!(matches!(result, Err(RecordStoreError::FarmerNotFound(_))));
}
