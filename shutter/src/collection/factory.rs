use crate::collection::{Collection, Entity};
use crate::errors::{ErrorKind, ShutterError, ShutterResult};
use crate::store::{Store, StoreProvider};
use dashmap::DashMap;
use std::any::Any;

/// Creates and caches collections, one per kind name.
///
/// The cache is what makes the registry a registry: the first open of a kind
/// replays its record set, every later open hands back the same collection,
/// and a second registration of the same kind name under a different entity
/// type is rejected.
pub(crate) struct CollectionFactory {
    collections: DashMap<String, Box<dyn Any + Send + Sync>>,
}

impl CollectionFactory {
    pub fn new() -> Self {
        CollectionFactory {
            collections: DashMap::new(),
        }
    }

    pub async fn get_collection<T: Entity>(&self, store: &Store) -> ShutterResult<Collection<T>> {
        if let Some(existing) = self.collections.get(T::KIND) {
            return match existing.downcast_ref::<Collection<T>>() {
                Some(collection) => Ok(collection.clone()),
                None => Err(type_mismatch(T::KIND)),
            };
        }

        let log = store.open_log(T::KIND).await?;
        let collection = Collection::<T>::open(log).await?;
        // A concurrent open of the same kind may have raced us here; whichever
        // handle landed in the cache is the one everybody gets.
        let entry = self
            .collections
            .entry(T::KIND.to_string())
            .or_insert_with(|| Box::new(collection));
        match entry.value().downcast_ref::<Collection<T>>() {
            Some(collection) => Ok(collection.clone()),
            None => Err(type_mismatch(T::KIND)),
        }
    }
}

fn type_mismatch(kind: &str) -> ShutterError {
    log::error!(
        "Collection '{}' is already registered with a different entity type",
        kind
    );
    ShutterError::new(
        &format!("Collection '{kind}' is already registered with a different entity type"),
        ErrorKind::ValidationError,
    )
}
