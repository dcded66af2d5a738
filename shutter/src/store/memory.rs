use crate::errors::{ErrorKind, ShutterError, ShutterResult};
use crate::store::{RecordLog, RecordLogProvider, StoreProvider};
use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// In-memory persistence backend.
///
/// # Purpose
///
/// `MemoryStore` implements the store contract without durability: record
/// sets live in process memory and are lost when the store is dropped. It is
/// the backend for unit tests and for ephemeral databases, and it is what a
/// [`ShutterBuilder`](crate::shutter_builder::ShutterBuilder) falls back to
/// when no store is configured.
///
/// # Usage
///
/// ```rust,ignore
/// let db = Shutter::builder().with_store(MemoryStore::new()).open().await?;
/// ```
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

struct MemoryStoreInner {
    logs: DashMap<String, RecordLog>,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            inner: Arc::new(MemoryStoreInner {
                logs: DashMap::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreProvider for MemoryStore {
    fn store_type(&self) -> &str {
        "in-memory"
    }

    async fn open_log(&self, name: &str) -> ShutterResult<RecordLog> {
        if self.is_closed() {
            log::error!("Cannot open log '{}': store is closed", name);
            return Err(ShutterError::new(
                &format!("Cannot open log '{}': store is closed", name),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        let log = self
            .inner
            .logs
            .entry(name.to_string())
            .or_insert_with(|| RecordLog::new(MemoryLog::new(name)))
            .clone();
        Ok(log)
    }

    fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    async fn close(&self) -> ShutterResult<()> {
        self.inner.closed.store(true, Ordering::Release);
        let logs: Vec<RecordLog> = self.inner.logs.iter().map(|e| e.value().clone()).collect();
        for log in logs {
            log.close().await?;
        }
        Ok(())
    }
}

struct MemoryLog {
    name: String,
    records: RwLock<IndexMap<String, Value>>,
    closed: AtomicBool,
}

impl MemoryLog {
    fn new(name: &str) -> Self {
        MemoryLog {
            name: name.to_string(),
            records: RwLock::new(IndexMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    fn ensure_open(&self) -> ShutterResult<()> {
        if self.closed.load(Ordering::Acquire) {
            log::error!("Record log '{}' is closed", self.name);
            return Err(ShutterError::new(
                &format!("Record log '{}' is closed", self.name),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordLogProvider for MemoryLog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append(&self, id: &str, document: Option<Value>) -> ShutterResult<()> {
        self.ensure_open()?;
        let mut records = self.records.write();
        match document {
            Some(value) => {
                records.insert(id.to_string(), value);
            }
            None => {
                records.shift_remove(id);
            }
        }
        Ok(())
    }

    async fn load_all(&self) -> ShutterResult<Vec<(String, Value)>> {
        self.ensure_open()?;
        Ok(self
            .records
            .read()
            .iter()
            .map(|(id, value)| (id.clone(), value.clone()))
            .collect())
    }

    async fn close(&self) -> ShutterResult<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replays_in_first_insertion_order() {
        let store = MemoryStore::new();
        let log = store.open_log("things").await.unwrap();
        log.append("a", Some(json!({"v": 1}))).await.unwrap();
        log.append("b", Some(json!({"v": 2}))).await.unwrap();
        log.append("a", Some(json!({"v": 3}))).await.unwrap();

        let ids: Vec<String> = log.load_all().await.unwrap().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[tokio::test]
    async fn tombstone_drops_the_record() {
        let store = MemoryStore::new();
        let log = store.open_log("things").await.unwrap();
        log.append("a", Some(json!({"v": 1}))).await.unwrap();
        log.append("a", None).await.unwrap();
        assert!(log.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_kind_shares_one_log() {
        let store = MemoryStore::new();
        let first = store.open_log("things").await.unwrap();
        let second = store.open_log("things").await.unwrap();
        first.append("a", Some(json!({}))).await.unwrap();
        assert_eq!(second.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_store_rejects_operations() {
        let store = MemoryStore::new();
        let log = store.open_log("things").await.unwrap();
        store.close().await.unwrap();
        assert!(store.is_closed());

        let err = store.open_log("more").await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);

        let err = log.append("a", None).await.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::StoreAlreadyClosed);
    }
}
