//! Shared type aliases.

use parking_lot::RwLock;
use std::sync::Arc;

/// A value behind a shared reader-writer lock.
pub type Atomic<T> = Arc<RwLock<T>>;

/// Wraps a value in an [`Atomic`].
pub fn atomic<T>(t: T) -> Atomic<T> {
    Arc::new(RwLock::new(t))
}
