use serde::{Deserialize, Serialize};
use shutter::collection::Entity;
use shutter::store::JournalStore;
use shutter::Shutter;
use std::sync::Once;
use tempfile::TempDir;

static LOG_INIT: Once = Once::new();

/// Initializes test logging once per process.
pub fn setup() {
    LOG_INIT.call_once(colog::init);
}

/// An ephemeral database over the in-memory store.
pub async fn memory_db() -> Shutter {
    setup();
    Shutter::builder().open().await.unwrap()
}

/// A durable database over a journal store in a fresh temp directory.
/// Keep the returned `TempDir` alive for the lifetime of the database.
pub async fn journal_db() -> (Shutter, TempDir) {
    setup();
    let dir = tempfile::tempdir().unwrap();
    let db = open_journal_db(dir.path()).await;
    (db, dir)
}

/// Opens (or reopens) a journal-backed database over an existing directory.
pub async fn open_journal_db(path: &std::path::Path) -> Shutter {
    let store = JournalStore::open(path).await.unwrap();
    Shutter::builder().with_store(store).open().await.unwrap()
}

/// A generic inventory document used by most store tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub label: String,
    pub qty: u32,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub label: String,
    pub qty: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub label: Option<String>,
    pub qty: Option<u32>,
}

impl Entity for Item {
    const KIND: &'static str = "items";
    type Draft = NewItem;
    type Patch = ItemPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: NewItem) -> Self {
        Item {
            id,
            label: draft.label,
            qty: draft.qty,
        }
    }

    fn apply(&mut self, patch: ItemPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(qty) = patch.qty {
            self.qty = qty;
        }
    }
}

pub fn new_item(label: &str) -> NewItem {
    NewItem {
        label: label.to_string(),
        qty: 1,
    }
}

/// A user-shaped document for the end-to-end scenario tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub username: Option<String>,
}

impl Entity for Account {
    const KIND: &'static str = "accounts";
    type Draft = NewAccount;
    type Patch = AccountPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn create(id: String, draft: NewAccount) -> Self {
        Account {
            id,
            name: draft.name,
            username: draft.username,
        }
    }

    fn apply(&mut self, patch: AccountPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
    }
}
