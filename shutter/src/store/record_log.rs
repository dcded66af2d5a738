use crate::errors::ShutterResult;
use async_trait::async_trait;
use serde_json::Value;
use std::ops::Deref;
use std::sync::Arc;

/// A durable, ordered record set for one collection kind.
///
/// Implementations must guarantee that an `append` which has returned `Ok`
/// survives a clean process restart, and that appends for the same document
/// id take effect in the order they were requested. Failures are reported to
/// the caller; a log must never acknowledge a write it did not record.
#[async_trait]
pub trait RecordLogProvider: Send + Sync {
    /// The collection kind this log belongs to.
    fn name(&self) -> &str;

    /// Records the full document for `id`, or a tombstone when `document`
    /// is `None`.
    async fn append(&self, id: &str, document: Option<Value>) -> ShutterResult<()>;

    /// Replays the record set into its current state: one entry per live
    /// document, in first-insertion order, with tombstoned ids dropped.
    /// Called once when the owning collection opens.
    async fn load_all(&self) -> ShutterResult<Vec<(String, Value)>>;

    /// Flushes and detaches the log; later appends fail.
    async fn close(&self) -> ShutterResult<()>;
}

/// Facade over a [`RecordLogProvider`].
///
/// Cheap to clone; all clones share the provider.
#[derive(Clone)]
pub struct RecordLog {
    inner: Arc<dyn RecordLogProvider>,
}

impl RecordLog {
    pub fn new<T: RecordLogProvider + 'static>(inner: T) -> Self {
        RecordLog {
            inner: Arc::new(inner),
        }
    }
}

impl std::fmt::Debug for RecordLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordLog").finish_non_exhaustive()
    }
}

impl Deref for RecordLog {
    type Target = dyn RecordLogProvider;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}
