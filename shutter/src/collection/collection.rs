use crate::collection::Entity;
use crate::errors::{ErrorKind, ShutterError, ShutterResult};
use crate::store::{RecordLog, RecordLogProvider};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A typed, insertion-ordered collection of documents.
///
/// # Purpose
///
/// `Collection<T>` owns the canonical in-memory copy of every document of
/// kind `T::KIND` and keeps the durable record set in step with it. Callers
/// get clones of documents, never references into the index, so stored state
/// can only change through [`insert`](Collection::insert),
/// [`update`](Collection::update) and [`delete`](Collection::delete).
///
/// # Consistency model
///
/// Every mutation passes through a per-collection FIFO gate (a fair async
/// mutex), so mutations are applied one at a time in issuance order and the
/// durable write for a document can never overtake an earlier one. The
/// durable append is awaited *before* the in-memory index is touched and
/// before the call returns: a reported persistence failure therefore leaves
/// no in-memory trace, and memory never leads the durable record.
///
/// The in-memory index itself is mutated synchronously under a
/// reader-writer lock, never across an await point, so readers always see
/// either all of a mutation or none of it.
///
/// Per document, the lifecycle is `nonexistent -> existing -> deleted`;
/// `deleted` is terminal and ids are never reused.
///
/// # Cloning
///
/// `Collection` is a cheap handle; clones share the same underlying state.
pub struct Collection<T: Entity> {
    inner: Arc<CollectionInner<T>>,
}

impl<T: Entity> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Collection {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Entity> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .finish_non_exhaustive()
    }
}

struct CollectionInner<T> {
    name: String,
    documents: RwLock<IndexMap<String, T>>,
    log: RecordLog,
    write_gate: Mutex<()>,
}

impl<T: Entity> Collection<T> {
    /// Opens the collection, replaying the durable record set into the
    /// in-memory index. Called once per kind by the collection factory.
    pub(crate) async fn open(log: RecordLog) -> ShutterResult<Self> {
        let mut documents = IndexMap::new();
        for (id, value) in log.load_all().await? {
            let document: T = serde_json::from_value(value).map_err(|error| {
                log::error!(
                    "Failed to decode document '{}' in collection '{}'",
                    id,
                    T::KIND
                );
                ShutterError::new_with_cause(
                    &format!("Failed to decode document '{}' in collection '{}'", id, T::KIND),
                    ErrorKind::ObjectMappingError,
                    error.into(),
                )
            })?;
            documents.insert(id, document);
        }
        log::info!(
            "Opened collection '{}' with {} documents",
            T::KIND,
            documents.len()
        );
        Ok(Collection {
            inner: Arc::new(CollectionInner {
                name: T::KIND.to_string(),
                documents: RwLock::new(documents),
                log,
                write_gate: Mutex::new(()),
            }),
        })
    }

    /// The collection kind name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Inserts a new document built from `draft`.
    ///
    /// A fresh identifier is assigned, the full document is appended to the
    /// durable record set, and only then is it published to the in-memory
    /// index and returned. Identifier uniqueness under concurrent inserts is
    /// the generator's guarantee, not a collection-level lock on the id
    /// space.
    pub async fn insert(&self, draft: T::Draft) -> ShutterResult<T> {
        let _gate = self.inner.write_gate.lock().await;
        let id = crate::new_document_id();
        let document = T::create(id.clone(), draft);
        let value = serde_json::to_value(&document)?;
        self.inner.log.append(&id, Some(value)).await?;
        self.inner.documents.write().insert(id, document.clone());
        Ok(document)
    }

    /// Returns the current document for `id`, or `None` if no such document
    /// exists, including ids that previously existed but were deleted, and
    /// ids belonging to other collections.
    ///
    /// Never performs I/O; the in-memory index is authoritative.
    pub fn get_by_id(&self, id: &str) -> Option<T> {
        self.inner.documents.read().get(id).cloned()
    }

    /// Shallow-merges `patch` into the document for `id` and persists the
    /// result. Omitted patch fields are left unchanged.
    ///
    /// Returns `Ok(None)` if the id does not resolve to an existing
    /// document; an update never creates a document.
    pub async fn update(&self, id: &str, patch: T::Patch) -> ShutterResult<Option<T>> {
        let _gate = self.inner.write_gate.lock().await;
        let current = self.inner.documents.read().get(id).cloned();
        let Some(mut document) = current else {
            return Ok(None);
        };
        document.apply(patch);
        let value = serde_json::to_value(&document)?;
        self.inner.log.append(id, Some(value)).await?;
        self.inner
            .documents
            .write()
            .insert(id.to_string(), document.clone());
        Ok(Some(document))
    }

    /// Removes the document for `id`, recording a tombstone in the durable
    /// record set.
    ///
    /// Returns `Ok(false)` if the id is already absent. Idempotent in
    /// effect, but absence is reported every time.
    pub async fn delete(&self, id: &str) -> ShutterResult<bool> {
        let _gate = self.inner.write_gate.lock().await;
        if !self.inner.documents.read().contains_key(id) {
            return Ok(false);
        }
        self.inner.log.append(id, None).await?;
        self.inner.documents.write().shift_remove(id);
        Ok(true)
    }

    /// Returns every document satisfying `predicate`, in insertion order.
    ///
    /// This is a full O(n) scan; there is no secondary indexing.
    pub fn find_where<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.inner
            .documents
            .read()
            .values()
            .filter(|document| predicate(document))
            .cloned()
            .collect()
    }

    /// Returns every document, in insertion order. Equivalent to
    /// [`find_where`](Collection::find_where) with an always-true predicate
    /// and just as much a full O(n) scan.
    pub fn get_all(&self) -> Vec<T> {
        self.inner.documents.read().values().cloned().collect()
    }

    /// Number of currently existing documents.
    pub fn len(&self) -> usize {
        self.inner.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.documents.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store, StoreProvider};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        title: String,
        body: String,
    }

    struct NewNote {
        title: String,
        body: String,
    }

    #[derive(Default)]
    struct NotePatch {
        title: Option<String>,
        body: Option<String>,
    }

    impl Entity for Note {
        const KIND: &'static str = "notes";
        type Draft = NewNote;
        type Patch = NotePatch;

        fn id(&self) -> &str {
            &self.id
        }

        fn create(id: String, draft: NewNote) -> Self {
            Note {
                id,
                title: draft.title,
                body: draft.body,
            }
        }

        fn apply(&mut self, patch: NotePatch) {
            if let Some(title) = patch.title {
                self.title = title;
            }
            if let Some(body) = patch.body {
                self.body = body;
            }
        }
    }

    async fn notes() -> Collection<Note> {
        let store = Store::new(MemoryStore::new());
        let log = store.open_log("notes").await.unwrap();
        Collection::open(log).await.unwrap()
    }

    fn draft(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_is_readable() {
        let notes = notes().await;
        let note = notes.insert(draft("first")).await.unwrap();
        assert!(!note.id.is_empty());
        assert_eq!(note.title, "first");
        assert_eq!(notes.get_by_id(&note.id), Some(note));
    }

    #[tokio::test]
    async fn update_merges_only_given_fields() {
        let notes = notes().await;
        let note = notes.insert(draft("first")).await.unwrap();
        let updated = notes
            .update(
                &note.id,
                NotePatch {
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "renamed");
        assert_eq!(updated.body, "body");
        assert_eq!(notes.get_by_id(&note.id), Some(updated));
    }

    #[tokio::test]
    async fn empty_patch_changes_nothing() {
        let notes = notes().await;
        let note = notes.insert(draft("first")).await.unwrap();
        let updated = notes
            .update(&note.id, NotePatch::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, note);
    }

    #[tokio::test]
    async fn update_unknown_id_is_none_and_creates_nothing() {
        let notes = notes().await;
        let result = notes
            .update("missing", NotePatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let notes = notes().await;
        let note = notes.insert(draft("first")).await.unwrap();
        assert!(notes.delete(&note.id).await.unwrap());
        assert_eq!(notes.get_by_id(&note.id), None);
        assert!(!notes.delete(&note.id).await.unwrap());
        assert!(!notes.delete(&note.id).await.unwrap());
    }

    #[tokio::test]
    async fn scans_keep_insertion_order_and_skip_deleted() {
        let notes = notes().await;
        notes.insert(draft("a")).await.unwrap();
        let b = notes.insert(draft("b")).await.unwrap();
        let c = notes.insert(draft("c")).await.unwrap();
        notes.delete(&b.id).await.unwrap();

        let all = notes.get_all();
        let titles: Vec<&str> = all.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["a", "c"]);

        let found = notes.find_where(|n| n.title != "a");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, c.id);

        // find_where with an always-true predicate is get_all
        assert_eq!(notes.find_where(|_| true), all);
    }

    #[tokio::test]
    async fn updated_document_keeps_its_scan_position() {
        let notes = notes().await;
        let a = notes.insert(draft("a")).await.unwrap();
        notes.insert(draft("b")).await.unwrap();
        notes
            .update(
                &a.id,
                NotePatch {
                    title: Some("a2".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let titles: Vec<String> = notes.get_all().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["a2", "b"]);
    }
}
