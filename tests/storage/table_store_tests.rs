//! TableStore interface tests.
//!
//! These tests verify the contract of the TableStore trait.
//! Each storage implementation should run these tests. Every test works in
//! its own freshly named partitions so runs against a shared table do not
//! interfere.

use fundraiser_registry::interfaces::{AttributeFilter, Item, TableStore};
use fundraiser_registry::keys::{KeyPrefix, StorageKey};
use serde_json::{json, Value};

fn unique(prefix: &str) -> String {
    format!("{}{}", prefix, &uuid::Uuid::new_v4().simple().to_string()[..8])
}

fn item(pk: &str, sk: &str, attributes: Value) -> Item {
    let mut item = match attributes {
        Value::Object(map) => map,
        _ => Item::new(),
    };
    item.insert("pk".to_string(), json!(pk));
    item.insert("sk".to_string(), json!(sk));
    item
}

fn sort_keys(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .map(|i| i["sk"].as_str().unwrap_or_default().to_string())
        .collect()
}

// =============================================================================
// TableStore::get / put tests
// =============================================================================

pub async fn test_get_nonexistent<S: TableStore>(store: &S) {
    let result = store
        .get(&StorageKey::new(unique("Ngo"), "Fundraiserx"))
        .await
        .expect("get should succeed");
    assert!(result.is_none(), "absent key should be None");
}

pub async fn test_put_and_get<S: TableStore>(store: &S) {
    let pk = unique("Ngo");
    store
        .put(item(&pk, "Fundraiserf1", json!({"fundraiserTitle": "Wells"})))
        .await
        .expect("put should succeed");

    let stored = store
        .get(&StorageKey::new(&pk, "Fundraiserf1"))
        .await
        .expect("get should succeed")
        .expect("item should exist");

    assert_eq!(stored["pk"], pk.as_str());
    assert_eq!(stored["sk"], "Fundraiserf1");
    assert_eq!(stored["fundraiserTitle"], "Wells");
}

pub async fn test_put_overwrites<S: TableStore>(store: &S) {
    let pk = unique("Individual");
    store
        .put(item(&pk, "Fundraiserf1", json!({"firstname": "Ann", "lastname": "Lee"})))
        .await
        .unwrap();
    store
        .put(item(&pk, "Fundraiserf1", json!({"firstname": "Anne"})))
        .await
        .unwrap();

    let stored = store
        .get(&StorageKey::new(&pk, "Fundraiserf1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["firstname"], "Anne");
    assert!(stored.get("lastname").is_none(), "put replaces the whole item");
}

// =============================================================================
// TableStore::delete tests
// =============================================================================

pub async fn test_delete_is_idempotent<S: TableStore>(store: &S) {
    let pk = unique("Fundraiser");
    let key = StorageKey::new(&pk, "Updateu1");
    store.put(item(&pk, "Updateu1", json!({}))).await.unwrap();

    store.delete(&key).await.expect("first delete should succeed");
    store.delete(&key).await.expect("second delete should succeed");

    assert!(store.get(&key).await.unwrap().is_none());
}

pub async fn test_delete_leaves_other_partitions<S: TableStore>(store: &S) {
    let ngo_id = unique("");
    let ngo_sk = format!("Ngo{}", ngo_id);
    let child_pk = format!("Ngo{}", ngo_id);
    store
        .put(item("DetailsNGO", &ngo_sk, json!({})))
        .await
        .unwrap();
    store
        .put(item(&child_pk, "Fundraiserf1", json!({})))
        .await
        .unwrap();

    store
        .delete(&StorageKey::new("DetailsNGO", &ngo_sk))
        .await
        .unwrap();

    let child = store
        .get(&StorageKey::new(&child_pk, "Fundraiserf1"))
        .await
        .unwrap();
    assert!(child.is_some(), "children survive parent delete");
}

// =============================================================================
// TableStore::query_prefix tests
// =============================================================================

pub async fn test_query_prefix_scoping<S: TableStore>(store: &S) {
    let pk = unique("Ngo");
    let longer_pk = format!("{}2", pk);
    store.put(item(&pk, "Fundraiserb", json!({}))).await.unwrap();
    store.put(item(&pk, "Fundraisera", json!({}))).await.unwrap();
    store.put(item(&pk, "Profile", json!({}))).await.unwrap();
    store
        .put(item(&longer_pk, "Fundraiserc", json!({})))
        .await
        .unwrap();

    let items = store
        .query_prefix(&KeyPrefix::new(&pk, "Fundraiser"), None)
        .await
        .expect("query should succeed");

    assert_eq!(sort_keys(&items), vec!["Fundraisera", "Fundraiserb"]);
}

pub async fn test_query_prefix_empty<S: TableStore>(store: &S) {
    let items = store
        .query_prefix(&KeyPrefix::new(unique("Fundraiser"), "Update"), None)
        .await
        .expect("empty listing should succeed");
    assert!(items.is_empty());
}

pub async fn test_query_prefix_filter<S: TableStore>(store: &S) {
    let pk = unique("Details");
    store
        .put(item(
            &pk,
            "Ngo1",
            json!({"ngoCountry": "Kenya", "ngoCategory": "Health & Water"}),
        ))
        .await
        .unwrap();
    store
        .put(item(
            &pk,
            "Ngo2",
            json!({"ngoCountry": "Kenya", "ngoCategory": "Education"}),
        ))
        .await
        .unwrap();
    store
        .put(item(
            &pk,
            "Ngo3",
            json!({"ngoCountry": "Uganda", "ngoCategory": "Health"}),
        ))
        .await
        .unwrap();

    let filter = AttributeFilter::new()
        .contains("ngoCountry", "Kenya")
        .contains("ngoCategory", "Health");
    let items = store
        .query_prefix(&KeyPrefix::new(&pk, "Ngo"), Some(&filter))
        .await
        .unwrap();
    assert_eq!(sort_keys(&items), vec!["Ngo1"]);

    let unfiltered = store
        .query_prefix(&KeyPrefix::new(&pk, "Ngo"), Some(&AttributeFilter::new()))
        .await
        .unwrap();
    assert_eq!(unfiltered.len(), 3, "empty filter places no constraint");
}

#[macro_export]
macro_rules! run_table_store_tests {
    ($store:expr) => {
        use $crate::storage::table_store_tests::*;

        // get / put tests
        test_get_nonexistent($store).await;
        println!("  test_get_nonexistent: PASSED");

        test_put_and_get($store).await;
        println!("  test_put_and_get: PASSED");

        test_put_overwrites($store).await;
        println!("  test_put_overwrites: PASSED");

        // delete tests
        test_delete_is_idempotent($store).await;
        println!("  test_delete_is_idempotent: PASSED");

        test_delete_leaves_other_partitions($store).await;
        println!("  test_delete_leaves_other_partitions: PASSED");

        // query tests
        test_query_prefix_scoping($store).await;
        println!("  test_query_prefix_scoping: PASSED");

        test_query_prefix_empty($store).await;
        println!("  test_query_prefix_empty: PASSED");

        test_query_prefix_filter($store).await;
        println!("  test_query_prefix_filter: PASSED");
    };
}
