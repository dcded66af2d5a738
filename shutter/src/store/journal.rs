use crate::errors::{ErrorKind, ShutterError, ShutterResult};
use crate::store::{RecordLog, RecordLogProvider, StoreProvider};
use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One journal line: the full document for `id`, or a tombstone when `doc`
/// is null.
#[derive(Serialize, Deserialize)]
struct JournalRecord {
    id: String,
    doc: Option<Value>,
}

/// Journal-backed persistence.
///
/// # Purpose
///
/// `JournalStore` keeps one append-only JSON-lines file per collection kind
/// under a data directory (`<root>/<kind>.log`). Every acknowledged mutation
/// is one line; replaying the file front to back reconstructs the record set
/// in first-insertion order, with tombstoned ids dropped.
///
/// # Durability
///
/// Appends are written and flushed before they are acknowledged, which is
/// what the store contract asks for: an acknowledged write survives a clean
/// process restart. The journal does not fsync per append, so it does not
/// defend against power loss.
///
/// # Recovery
///
/// A torn trailing line (an append interrupted mid-write) is dropped with a
/// warning on replay. An unparseable line anywhere else means the journal
/// was corrupted and replay fails with [`ErrorKind::FileCorrupted`].
#[derive(Clone)]
pub struct JournalStore {
    inner: Arc<JournalStoreInner>,
}

struct JournalStoreInner {
    root: PathBuf,
    logs: DashMap<String, RecordLog>,
    closed: AtomicBool,
}

impl JournalStore {
    /// Opens a journal store rooted at `root`, creating the directory on
    /// demand.
    pub async fn open(root: impl Into<PathBuf>) -> ShutterResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|error| {
            log::error!("Failed to create journal root '{}'", root.display());
            ShutterError::new_with_cause(
                &format!("Failed to create journal root '{}'", root.display()),
                ErrorKind::BackendError,
                error.into(),
            )
        })?;
        Ok(JournalStore {
            inner: Arc::new(JournalStoreInner {
                root,
                logs: DashMap::new(),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// The data directory this store writes under.
    pub fn root(&self) -> &Path {
        &self.inner.root
    }
}

#[async_trait]
impl StoreProvider for JournalStore {
    fn store_type(&self) -> &str {
        "journal"
    }

    async fn open_log(&self, name: &str) -> ShutterResult<RecordLog> {
        if self.is_closed() {
            log::error!("Cannot open journal '{}': store is closed", name);
            return Err(ShutterError::new(
                &format!("Cannot open journal '{}': store is closed", name),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        if let Some(existing) = self.inner.logs.get(name) {
            return Ok(existing.clone());
        }
        let path = self.inner.root.join(format!("{name}.log"));
        let journal = JournalLog::open(name, path).await?;
        let log = self
            .inner
            .logs
            .entry(name.to_string())
            .or_insert_with(|| RecordLog::new(journal))
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
        log::info!("Closed journal store at '{}'", self.inner.root.display());
        Ok(())
    }
}

struct JournalLog {
    name: String,
    path: PathBuf,
    // None once the log is closed
    file: Mutex<Option<File>>,
}

impl JournalLog {
    async fn open(name: &str, path: PathBuf) -> ShutterResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|error| {
                log::error!("Failed to open journal '{}'", path.display());
                ShutterError::new_with_cause(
                    &format!("Failed to open journal '{}'", path.display()),
                    ErrorKind::BackendError,
                    error.into(),
                )
            })?;
        Ok(JournalLog {
            name: name.to_string(),
            path,
            file: Mutex::new(Some(file)),
        })
    }
}

#[async_trait]
impl RecordLogProvider for JournalLog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append(&self, id: &str, document: Option<Value>) -> ShutterResult<()> {
        let mut line = serde_json::to_string(&JournalRecord {
            id: id.to_string(),
            doc: document,
        })?;
        line.push('\n');

        let mut guard = self.file.lock().await;
        let Some(file) = guard.as_mut() else {
            log::error!("Record log '{}' is closed", self.name);
            return Err(ShutterError::new(
                &format!("Record log '{}' is closed", self.name),
                ErrorKind::StoreAlreadyClosed,
            ));
        };
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn load_all(&self) -> ShutterResult<Vec<(String, Value)>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let lines: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        let mut state: IndexMap<String, Value> = IndexMap::new();
        for (index, line) in lines.iter().enumerate() {
            match serde_json::from_str::<JournalRecord>(line) {
                Ok(record) => match record.doc {
                    Some(value) => {
                        state.insert(record.id, value);
                    }
                    None => {
                        state.shift_remove(&record.id);
                    }
                },
                Err(error) => {
                    if index + 1 == lines.len() {
                        log::warn!(
                            "Dropping torn trailing record in '{}': {}",
                            self.path.display(),
                            error
                        );
                        break;
                    }
                    log::error!("Journal '{}' is corrupted at line {}", self.path.display(), index + 1);
                    return Err(ShutterError::new_with_cause(
                        &format!(
                            "Journal '{}' is corrupted at line {}",
                            self.path.display(),
                            index + 1
                        ),
                        ErrorKind::FileCorrupted,
                        error.into(),
                    ));
                }
            }
        }
        Ok(state.into_iter().collect())
    }

    async fn close(&self) -> ShutterResult<()> {
        let mut guard = self.file.lock().await;
        if let Some(file) = guard.take() {
            file.sync_all().await?;
        }
        Ok(())
    }
}
