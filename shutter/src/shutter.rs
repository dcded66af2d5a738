use crate::collection::{Collection, CollectionFactory, Entity};
use crate::errors::{ErrorKind, ShutterError, ShutterResult};
use crate::shutter_builder::ShutterBuilder;
use crate::store::{Store, StoreProvider};
use std::sync::Arc;

/// The database facade: a schema registry of typed collections over one
/// persistence backend.
///
/// # Purpose
///
/// A `Shutter` instance owns exactly one [`Collection`] per entity kind for
/// the lifetime of the process. The first [`collection`](Shutter::collection)
/// call for a kind replays its durable record set; every later call returns
/// the same collection. The registry itself never changes shape after the
/// collections are opened; there is no dynamic addition or removal of
/// kinds.
///
/// Construct it once at startup and pass it (or an application struct built
/// from its collections) into request handlers explicitly; nothing in this
/// crate maintains a process-global instance.
///
/// # Usage
///
/// ```rust,ignore
/// let db = Shutter::builder()
///     .with_store(JournalStore::open("data").await?)
///     .open()
///     .await?;
/// let users = db.collection::<User>().await?;
/// ```
#[derive(Clone)]
pub struct Shutter {
    inner: Arc<ShutterInner>,
}

struct ShutterInner {
    store: Store,
    factory: CollectionFactory,
}

impl Shutter {
    /// Returns a builder for configuring and opening a database.
    pub fn builder() -> ShutterBuilder {
        ShutterBuilder::new()
    }

    pub(crate) fn new(store: Store) -> Self {
        Shutter {
            inner: Arc::new(ShutterInner {
                store,
                factory: CollectionFactory::new(),
            }),
        }
    }

    /// Returns the collection for `T::KIND`, opening and populating it from
    /// the persistence backend on first use.
    pub async fn collection<T: Entity>(&self) -> ShutterResult<Collection<T>> {
        if self.inner.store.is_closed() {
            log::error!("Cannot open collection '{}': database is closed", T::KIND);
            return Err(ShutterError::new(
                &format!("Cannot open collection '{}': database is closed", T::KIND),
                ErrorKind::InvalidOperation,
            ));
        }
        self.inner.factory.get_collection::<T>(&self.inner.store).await
    }

    /// The persistence backend behind this database.
    pub fn store(&self) -> Store {
        self.inner.store.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.store.is_closed()
    }

    /// Flushes and closes the persistence backend. Collections stay readable
    /// (the in-memory index is untouched) but every later mutation fails.
    pub async fn close(&self) -> ShutterResult<()> {
        log::info!("Closing {} database", self.inner.store.store_type());
        self.inner.store.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Flag {
        id: String,
        label: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct OtherFlag {
        id: String,
        label: String,
    }

    struct NewFlag {
        label: String,
    }

    impl Entity for Flag {
        const KIND: &'static str = "flags";
        type Draft = NewFlag;
        type Patch = ();

        fn id(&self) -> &str {
            &self.id
        }

        fn create(id: String, draft: NewFlag) -> Self {
            Flag { id, label: draft.label }
        }

        fn apply(&mut self, _patch: ()) {}
    }

    impl Entity for OtherFlag {
        const KIND: &'static str = "flags";
        type Draft = NewFlag;
        type Patch = ();

        fn id(&self) -> &str {
            &self.id
        }

        fn create(id: String, draft: NewFlag) -> Self {
            OtherFlag { id, label: draft.label }
        }

        fn apply(&mut self, _patch: ()) {}
    }

    #[tokio::test]
    async fn same_kind_returns_the_same_collection() {
        let db = Shutter::builder().open().await.unwrap();
        let first = db.collection::<Flag>().await.unwrap();
        let second = db.collection::<Flag>().await.unwrap();
        first
            .insert(NewFlag { label: "x".to_string() })
            .await
            .unwrap();
        assert_eq!(second.len(), 1);
    }

    #[tokio::test]
    async fn kind_reuse_with_different_type_is_rejected() {
        let db = Shutter::builder().open().await.unwrap();
        let _flags = db.collection::<Flag>().await.unwrap();
        let err = db.collection::<OtherFlag>().await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn closed_database_rejects_collection_opens() {
        let db = Shutter::builder().with_store(MemoryStore::new()).open().await.unwrap();
        db.close().await.unwrap();
        assert!(db.is_closed());
        let err = db.collection::<Flag>().await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidOperation);
    }

    #[tokio::test]
    async fn mutations_fail_after_close() {
        let db = Shutter::builder().open().await.unwrap();
        let flags = db.collection::<Flag>().await.unwrap();
        flags
            .insert(NewFlag { label: "x".to_string() })
            .await
            .unwrap();
        db.close().await.unwrap();

        // reads still serve the in-memory index
        assert_eq!(flags.len(), 1);
        let err = flags
            .insert(NewFlag { label: "y".to_string() })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
    }
}
