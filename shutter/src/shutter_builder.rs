use crate::errors::ShutterResult;
use crate::shutter::Shutter;
use crate::store::{MemoryStore, Store, StoreProvider};

/// Builder for creating and configuring a [`Shutter`] database instance.
///
/// # Examples
///
/// ```rust,ignore
/// // Ephemeral database (in-memory store)
/// let db = Shutter::builder().open().await?;
///
/// // Durable database over a journal directory
/// let db = Shutter::builder()
///     .with_store(JournalStore::open("data").await?)
///     .open()
///     .await?;
/// ```
#[derive(Default)]
pub struct ShutterBuilder {
    store: Option<Store>,
}

impl ShutterBuilder {
    pub fn new() -> Self {
        ShutterBuilder { store: None }
    }

    /// Sets the persistence backend. Without this, `open` falls back to an
    /// in-memory store.
    pub fn with_store<T: StoreProvider + 'static>(mut self, provider: T) -> Self {
        self.store = Some(Store::new(provider));
        self
    }

    /// Opens the database.
    pub async fn open(self) -> ShutterResult<Shutter> {
        let store = self
            .store
            .unwrap_or_else(|| Store::new(MemoryStore::new()));
        log::info!("Opened database with {} store", store.store_type());
        Ok(Shutter::new(store))
    }
}
