//! Persistence adapters.
//!
//! The persistence layer is pluggable. A [`StoreProvider`] hands out one
//! [`RecordLog`] per collection kind; the log durably records every mutation
//! (full document on insert/update, tombstone on delete) and replays the
//! record set when a collection opens.
//!
//! Two providers ship with the crate:
//! - [`MemoryStore`] keeps record sets in memory, for tests and ephemeral
//!   databases
//! - [`JournalStore`] appends JSON-lines journals under a data directory,
//!   one file per collection kind
//!
//! The contract is recoverability, not byte layout: an acknowledged write
//! survives a clean process restart, and writes for the same document are
//! applied in the order they were requested.

mod journal;
mod memory;
mod record_log;
mod store;

pub use journal::*;
pub use memory::*;
pub use record_log::*;
pub use store::*;
