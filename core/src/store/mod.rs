//! Preference store interface and implementations.
//!
//! Provides the `PrefStore`/`PersistentPrefStore` traits and the
//! in-memory `MemoryPrefStore` implementation used for tests and
//! defaults. The memory store emulates a persistent store faithfully,
//! including deferred read completion and read-error injection, without
//! performing any I/O.

pub mod map;
pub mod memory;
pub mod mock;
pub mod observer;

use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ReadError;
use crate::store::map::StoreValue;
use crate::store::observer::{PrefObserver, ReadErrorDelegate};

/// Opaque per-mutation flag bitmask. The store never interprets flags;
/// they are carried through to `report_value_changed` unchanged.
pub type WriteFlags = u32;

/// Read surface of a preference store.
///
/// All methods take `&self`: implementations use interior mutability so
/// observers can call back into the store from their own callbacks.
pub trait PrefStore {
    /// Look up the value stored under `key`. Returns a copy; in-place
    /// edits go through [`PersistentPrefStore::with_mutable_value`].
    fn get_value(&self, key: &str) -> Option<StoreValue>;

    /// Structural copy of every entry in the store.
    fn get_values(&self) -> HashMap<String, StoreValue>;

    /// Register an observer for change and initialization notifications.
    fn add_observer(&self, observer: Rc<dyn PrefObserver>);

    /// Deregister an observer; no-op if it was not registered.
    fn remove_observer(&self, observer: &Rc<dyn PrefObserver>);

    /// Whether any observer is currently registered.
    fn has_observers(&self) -> bool;

    /// Whether initialization has completed.
    fn is_initialization_complete(&self) -> bool;
}

/// Full operation set of a writable, persistent-store-shaped preference
/// store.
pub trait PersistentPrefStore: PrefStore {
    /// Grant the closure temporary exclusive in-place access to the
    /// value under `key`. Returns false (without running the closure)
    /// if the key is absent. The store does not detect the mutation;
    /// the caller must follow up with [`report_value_changed`].
    ///
    /// [`report_value_changed`]: PersistentPrefStore::report_value_changed
    fn with_mutable_value(&self, key: &str, f: &mut dyn FnMut(&mut StoreValue)) -> bool;

    /// Notify observers that `key` changed and mark the store
    /// uncommitted. Does not alter the stored value.
    fn report_value_changed(&self, key: &str, flags: WriteFlags);

    /// Insert or overwrite a value, mark the store uncommitted, and
    /// notify observers. Notification fires even when the new value
    /// equals the old one.
    fn set_value(&self, key: &str, value: StoreValue, flags: WriteFlags);

    /// Same as [`set_value`], but never notifies.
    ///
    /// [`set_value`]: PersistentPrefStore::set_value
    fn set_value_silently(&self, key: &str, value: StoreValue, flags: WriteFlags);

    /// Remove `key` if present: mark uncommitted, notify once, return
    /// true. A miss is a full no-op returning false.
    fn remove_value(&self, key: &str, flags: WriteFlags) -> bool;

    /// Remove every key covered by `prefix` at a path-segment boundary.
    /// Never notifies; marks the store uncommitted only if at least one
    /// key was removed. Returns the number of keys removed.
    fn remove_values_by_prefix_silently(&self, prefix: &str) -> usize;

    /// Remove all entries without notifying.
    fn clear_mutable_values(&self);

    /// Observable read-only flag. Enforcement is the caller's
    /// responsibility; mutation is still permitted at this layer.
    fn read_only(&self) -> bool;

    /// The configured read outcome.
    fn get_read_error(&self) -> ReadError;

    /// Synchronous read: returns the configured outcome immediately.
    /// Touches neither initialization state nor observers.
    fn read_prefs(&self) -> ReadError;

    /// Asynchronous read simulation. When async reads are not blocked
    /// the outcome resolves before this returns: a failing read invokes
    /// the delegate synchronously, a succeeding read drops it. When
    /// blocked, the delegate is parked until the pending read is
    /// completed externally.
    ///
    /// Panics if an async read is already pending.
    fn read_prefs_async(&self, delegate: Option<Box<dyn ReadErrorDelegate>>);

    /// Commit the in-memory state. There is no real backing store, so
    /// both callbacks run before this returns, `sync_done` first.
    fn commit_pending_write(
        &self,
        done: Option<Box<dyn FnOnce()>>,
        sync_done: Option<Box<dyn FnOnce()>>,
    );

    /// No-op marker; lossy writes are never actually deferred here.
    fn schedule_pending_lossy_writes(&self);

    /// The backing store was deleted externally: clear all entries
    /// without notifying, marking the store uncommitted.
    fn on_store_deletion_from_disk(&self);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryPrefStore;

    #[test]
    fn memory_store_implements_persistent_pref_store() {
        let store = MemoryPrefStore::new();
        // Ensure the trait object can be constructed.
        let _: &dyn PersistentPrefStore = &store;
    }
}
