use serde::{Deserialize, Serialize};
use shutter::collection::Entity;
use shutter::errors::ErrorKind;
use shutter_int_test::test_util::{journal_db, memory_db, new_item, Item};

#[tokio::test]
async fn the_registry_hands_out_one_collection_per_kind() {
    let db = memory_db().await;
    let first = db.collection::<Item>().await.unwrap();
    let second = db.collection::<Item>().await.unwrap();

    first.insert(new_item("shared")).await.unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second.get_all()[0].label, "shared");
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemImpostor {
    id: String,
    label: String,
    qty: u32,
}

impl Entity for ItemImpostor {
    const KIND: &'static str = "items";
    type Draft = ();
    type Patch = ();

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, _draft: ()) -> Self {
        ItemImpostor {
            id,
            label: String::new(),
            qty: 0,
        }
    }

    fn apply(&mut self, _patch: ()) {}
}

#[tokio::test]
async fn a_kind_cannot_be_reopened_under_another_type() {
    let db = memory_db().await;
    let _items = db.collection::<Item>().await.unwrap();
    let err = db.collection::<ItemImpostor>().await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
}

#[tokio::test]
async fn a_closed_database_rejects_new_collections_and_mutations() {
    let (db, _dir) = journal_db().await;
    let items = db.collection::<Item>().await.unwrap();
    items.insert(new_item("before close")).await.unwrap();
    db.close().await.unwrap();
    assert!(db.is_closed());

    let err = db.collection::<Item>().await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

    let err = items.insert(new_item("after close")).await.unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);

    // the in-memory index is still readable
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn inserts_are_visible_to_the_seeding_caller_immediately() {
    let (db, _dir) = journal_db().await;
    let items = db.collection::<Item>().await.unwrap();
    for n in 0..5 {
        let item = items.insert(new_item(&format!("seed-{n}"))).await.unwrap();
        assert!(!item.id.is_empty());
        assert_eq!(items.get_by_id(&item.id), Some(item));
    }
    assert_eq!(items.len(), 5);
}
