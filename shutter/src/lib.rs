//! # Shutter - Embedded Document Store
//!
//! Shutter is a small embedded document store: typed, schema-declared
//! collections of documents with identifier generation, point lookups,
//! partial updates, predicate scans, deletions, and durable persistence.
//!
//! ## Key Features
//!
//! - **Embedded**: an in-process library, no server and no wire protocol
//! - **Typed Collections**: one declared record type per collection kind,
//!   tagged by the kind name; the store never inspects document shape
//! - **Insertion-Ordered Scans**: `get_all`/`find_where` iterate documents
//!   in insertion order, as a contract rather than an accident
//! - **Durable**: every acknowledged mutation is recorded by a persistence
//!   adapter before it becomes visible, and collections are rebuilt from
//!   the durable record on restart
//! - **Ordered Mutations**: mutations on a collection are applied one at a
//!   time, in issuance order, even with many in-flight async callers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shutter::collection::Entity;
//! use shutter::store::JournalStore;
//! use shutter::Shutter;
//!
//! let store = JournalStore::open("data").await?;
//! let db = Shutter::builder().with_store(store).open().await?;
//!
//! let users = db.collection::<User>().await?;
//! let julie = users.insert(NewUser { name: "Julie".into(), .. }).await?;
//! assert_eq!(users.get_by_id(julie.id()).as_ref(), Some(&julie));
//! ```
//!
//! ## Module Organization
//!
//! - [`collection`] - Typed collections, the entity trait, and id generation
//! - [`common`] - Shared type aliases
//! - [`errors`] - Error types and result definitions
//! - [`store`] - Persistence adapters (in-memory and journal-backed)
//! - [`shutter`] - Core database interface
//! - [`shutter_builder`] - Database builder for initialization

use crate::collection::RandomIdGenerator;
use std::sync::LazyLock;

pub mod collection;
pub mod common;
pub mod errors;
pub mod shutter;
pub mod shutter_builder;
pub mod store;

pub use crate::collection::{Collection, Entity};
pub use crate::shutter::Shutter;
pub use crate::shutter_builder::ShutterBuilder;

pub(crate) static ID_GENERATOR: LazyLock<RandomIdGenerator> =
    LazyLock::new(RandomIdGenerator::new);

/// Returns a fresh document identifier from the process-wide generator.
///
/// Collections call this during `insert`; collaborators that need ids in the
/// same format (for example, for generated file names) may call it directly.
pub fn new_document_id() -> String {
    ID_GENERATOR.next_id()
}
