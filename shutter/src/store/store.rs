use crate::errors::ShutterResult;
use crate::store::RecordLog;
use async_trait::async_trait;
use std::ops::Deref;
use std::sync::Arc;

/// A persistence backend: a set of record logs, one per collection kind.
///
/// Providers own the lifecycle of their logs. `open_log` must return the
/// same log for the same kind for the lifetime of the store, so that every
/// collection handle observes one durable record set.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    /// Short backend name for log output ("in-memory", "journal", ...).
    fn store_type(&self) -> &str;

    /// Opens, or returns the already-open, record log for `name`.
    async fn open_log(&self, name: &str) -> ShutterResult<RecordLog>;

    /// Whether the store has been closed.
    fn is_closed(&self) -> bool;

    /// Flushes and closes every open log; later operations fail.
    async fn close(&self) -> ShutterResult<()>;
}

/// Facade over a [`StoreProvider`].
///
/// Cheap to clone; all clones share the provider.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn StoreProvider>,
}

impl Store {
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        Store {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for Store {
    type Target = dyn StoreProvider;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}
