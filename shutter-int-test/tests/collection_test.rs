use shutter_int_test::test_util::{
    memory_db, new_item, Account, AccountPatch, Item, ItemPatch, NewAccount,
};

#[tokio::test]
async fn insert_then_get_returns_the_inserted_fields_plus_id() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    let item = items.insert(new_item("turnip")).await.unwrap();
    assert!(!item.id.is_empty());
    assert_eq!(item.label, "turnip");
    assert_eq!(item.qty, 1);
    assert_eq!(items.get_by_id(&item.id), Some(item));
}

#[tokio::test]
async fn delete_round_trip_ends_in_not_found() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    let item = items.insert(new_item("turnip")).await.unwrap();
    assert!(items.delete(&item.id).await.unwrap());
    assert_eq!(items.get_by_id(&item.id), None);
}

#[tokio::test]
async fn deleting_an_absent_id_reports_not_found_every_time() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    assert!(!items.delete("never-existed").await.unwrap());
    assert!(!items.delete("never-existed").await.unwrap());

    let item = items.insert(new_item("turnip")).await.unwrap();
    assert!(items.delete(&item.id).await.unwrap());
    assert!(!items.delete(&item.id).await.unwrap());
    assert!(!items.delete(&item.id).await.unwrap());
}

#[tokio::test]
async fn empty_patch_leaves_the_document_unchanged() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    let item = items.insert(new_item("turnip")).await.unwrap();
    let before = serde_json::to_vec(&items.get_by_id(&item.id).unwrap()).unwrap();
    items.update(&item.id, ItemPatch::default()).await.unwrap();
    let after = serde_json::to_vec(&items.get_by_id(&item.id).unwrap()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn find_where_is_exactly_the_matching_subset_of_get_all() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    for label in ["a", "b", "ab", "c"] {
        items.insert(new_item(label)).await.unwrap();
    }
    let doomed = items.insert(new_item("ab-doomed")).await.unwrap();
    items.delete(&doomed.id).await.unwrap();

    let all = items.get_all();
    let matches = items.find_where(|item| item.label.contains('a'));
    let expected: Vec<Item> = all
        .iter()
        .filter(|item| item.label.contains('a'))
        .cloned()
        .collect();
    assert_eq!(matches, expected);
    assert!(matches.iter().all(|item| item.id != doomed.id));
}

#[tokio::test]
async fn scans_iterate_in_insertion_order() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    for label in ["first", "second", "third"] {
        items.insert(new_item(label)).await.unwrap();
    }
    let labels: Vec<String> = items.get_all().into_iter().map(|item| item.label).collect();
    assert_eq!(labels, ["first", "second", "third"]);
}

#[tokio::test]
async fn ids_do_not_leak_across_collections() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();
    let accounts = db.collection::<Account>().await.unwrap();

    let item = items.insert(new_item("turnip")).await.unwrap();
    assert_eq!(accounts.get_by_id(&item.id), None);
    assert!(accounts
        .update(&item.id, AccountPatch::default())
        .await
        .unwrap()
        .is_none());
    assert!(!accounts.delete(&item.id).await.unwrap());
    // and the item is untouched
    assert_eq!(items.get_by_id(&item.id), Some(item));
}

#[tokio::test]
async fn update_never_creates_a_document() {
    let db = memory_db().await;
    let items = db.collection::<Item>().await.unwrap();

    let result = items
        .update(
            "missing",
            ItemPatch {
                label: Some("ghost".to_string()),
                qty: None,
            },
        )
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(items.is_empty());
    assert_eq!(items.get_by_id("missing"), None);
}

// Full account lifecycle: create, read back, rename, delete.
#[tokio::test]
async fn account_lifecycle_scenario() {
    let db = memory_db().await;
    let accounts = db.collection::<Account>().await.unwrap();

    let julie = accounts
        .insert(NewAccount {
            name: "Julie".to_string(),
            username: "julie".to_string(),
        })
        .await
        .unwrap();
    assert!(!julie.id.is_empty());
    assert_eq!(julie.username, "julie");
    assert_eq!(accounts.get_by_id(&julie.id), Some(julie.clone()));

    let renamed = accounts
        .update(
            &julie.id,
            AccountPatch {
                name: Some("J.".to_string()),
                username: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "J.");
    assert_eq!(renamed.username, "julie");
    assert_eq!(accounts.get_by_id(&julie.id), Some(renamed));

    assert!(accounts.delete(&julie.id).await.unwrap());
    assert_eq!(accounts.get_by_id(&julie.id), None);
}
