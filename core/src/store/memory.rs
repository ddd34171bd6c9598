//! In-memory preference store with simulated persistence.
//!
//! Behaves like a file-backed store without touching disk: reads have
//! injectable success/failure outcomes, asynchronous reads can be held
//! pending and completed on demand, and a committed flag tracks whether
//! the in-memory state has diverged from its (simulated) backing since
//! the last commit. Intended for tests and as the default store when no
//! real persistence is wired up.
//!
//! The store is single-threaded and cooperative: every effect, including
//! observer dispatch, completes before the triggering call returns, and
//! a store mutation always happens before the notification it causes.
//! Share it as `Rc<MemoryPrefStore>` so observers can call back into it
//! from their own callbacks.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ReadError;
use crate::store::map::{PrefValueMap, StoreValue};
use crate::store::observer::{ObserverRegistry, PrefObserver, ReadErrorDelegate};
use crate::store::{PersistentPrefStore, PrefStore, WriteFlags};

/// In-memory implementation of [`PersistentPrefStore`].
pub struct MemoryPrefStore {
    /// Stores the preference values.
    prefs: RefCell<PrefValueMap>,
    observers: ObserverRegistry,
    /// Observable read-only flag; not enforced at this layer.
    read_only: Cell<bool>,
    /// Outcome reported to observers on initialization completion and
    /// used to decide whether a failing async read fires its delegate.
    read_success: Cell<bool>,
    /// The code returned from `read_prefs` and delivered on failure.
    read_error: Cell<ReadError>,
    /// Whether `read_prefs_async` should park instead of completing.
    block_async_read: Cell<bool>,
    /// Whether an async read has been requested but not completed.
    pending_async_read: Cell<bool>,
    /// Transitions false -> true exactly once; never reverts.
    init_complete: Cell<bool>,
    /// True iff no mutation has happened since the last commit.
    committed: Cell<bool>,
    /// At most one parked delegate; consumed on invoke.
    error_delegate: RefCell<Option<Box<dyn ReadErrorDelegate>>>,
}

impl MemoryPrefStore {
    /// Create an empty store: read succeeds, nothing pending, committed.
    pub fn new() -> Self {
        MemoryPrefStore {
            prefs: RefCell::new(PrefValueMap::new()),
            observers: ObserverRegistry::new(),
            read_only: Cell::new(false),
            read_success: Cell::new(true),
            read_error: Cell::new(ReadError::None),
            block_async_read: Cell::new(false),
            pending_async_read: Cell::new(false),
            init_complete: Cell::new(false),
            committed: Cell::new(true),
            error_delegate: RefCell::new(None),
        }
    }

    /// Mark the store as having completed initialization and notify
    /// observers.
    pub fn set_initialization_completed(&self) {
        self.notify_initialization_completed();
    }

    /// Set the init-complete flag (idempotent) and dispatch
    /// `on_initialization_completed` with the configured read outcome.
    /// Dispatch is not suppressed on repeat calls.
    pub fn notify_initialization_completed(&self) {
        self.init_complete.set(true);
        self.observers.notify_init_completed(self.read_success.get());
    }

    /// Notify observers of a change to `key` without touching any store
    /// state. Explicit trigger for tests.
    pub fn notify_pref_value_changed(&self, key: &str) {
        self.observers.notify_value_changed(key);
    }

    /// Resolve a pending asynchronous read, if any.
    ///
    /// On a failing read the parked delegate is invoked with the
    /// configured error; on a succeeding read it is dropped uninvoked.
    /// Either way the delegate slot is emptied and the store returns to
    /// idle. No-op when no read is pending, so the outcome can fire at
    /// most once per requested read.
    pub fn complete_pending_read(&self) {
        if !self.pending_async_read.get() {
            return;
        }
        self.pending_async_read.set(false);
        let delegate = self.error_delegate.borrow_mut().take();
        if !self.read_success.get() {
            if let Some(delegate) = delegate {
                delegate.on_error(self.read_error.get());
            }
        }
    }

    /// Control whether `read_prefs_async` completes immediately.
    ///
    /// Defaults to non-blocking. Set to true before calling
    /// `read_prefs_async` to park the read; setting back to false
    /// completes the pending read.
    pub fn set_block_async_read(&self, block_async_read: bool) {
        self.block_async_read.set(block_async_read);
        if !block_async_read {
            self.complete_pending_read();
        }
    }

    /// Set the observable read-only flag.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Configure whether simulated reads succeed.
    pub fn set_read_success(&self, read_success: bool) {
        self.read_success.set(read_success);
    }

    /// Configure the read outcome code.
    pub fn set_read_error(&self, read_error: ReadError) {
        self.read_error.set(read_error);
    }

    /// Whether the store has been committed since the last mutation.
    pub fn committed(&self) -> bool {
        self.committed.get()
    }

    /// Whether an asynchronous read is parked awaiting completion.
    pub fn has_pending_async_read(&self) -> bool {
        self.pending_async_read.get()
    }

    /// Store a string value, notifying observers.
    pub fn set_string(&self, key: &str, value: &str) {
        self.set_value(key, StoreValue::from(value), 0);
    }

    /// Store an integer value, notifying observers.
    pub fn set_integer(&self, key: &str, value: i64) {
        self.set_value(key, StoreValue::from(value), 0);
    }

    /// Store a boolean value, notifying observers.
    pub fn set_boolean(&self, key: &str, value: bool) {
        self.set_value(key, StoreValue::from(value), 0);
    }

    /// Read a string value; misses on an absent key or other type.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.prefs
            .borrow()
            .get(key)
            .and_then(|v| v.as_str().map(str::to_string))
    }

    /// Read an integer value; misses on an absent key or other type.
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.prefs.borrow().get(key).and_then(StoreValue::as_i64)
    }

    /// Read a boolean value; misses on an absent key or other type.
    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.prefs.borrow().get(key).and_then(StoreValue::as_bool)
    }
}

impl Default for MemoryPrefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefStore for MemoryPrefStore {
    fn get_value(&self, key: &str) -> Option<StoreValue> {
        self.prefs.borrow().get(key).cloned()
    }

    fn get_values(&self) -> HashMap<String, StoreValue> {
        self.prefs.borrow().snapshot()
    }

    fn add_observer(&self, observer: Rc<dyn PrefObserver>) {
        self.observers.add(&observer);
    }

    fn remove_observer(&self, observer: &Rc<dyn PrefObserver>) {
        self.observers.remove(observer);
    }

    fn has_observers(&self) -> bool {
        self.observers.has_observers()
    }

    fn is_initialization_complete(&self) -> bool {
        self.init_complete.get()
    }
}

impl PersistentPrefStore for MemoryPrefStore {
    fn with_mutable_value(&self, key: &str, f: &mut dyn FnMut(&mut StoreValue)) -> bool {
        // The map stays borrowed while the closure runs; the closure
        // must not call back into the store.
        let mut prefs = self.prefs.borrow_mut();
        match prefs.get_mut(key) {
            Some(value) => {
                f(value);
                true
            }
            None => false,
        }
    }

    fn report_value_changed(&self, key: &str, _flags: WriteFlags) {
        self.committed.set(false);
        self.observers.notify_value_changed(key);
    }

    fn set_value(&self, key: &str, value: StoreValue, flags: WriteFlags) {
        // Store first, notify second: no value-equality check, the
        // notification fires even on an identical rewrite.
        self.prefs.borrow_mut().insert(key, value);
        self.report_value_changed(key, flags);
    }

    fn set_value_silently(&self, key: &str, value: StoreValue, _flags: WriteFlags) {
        self.prefs.borrow_mut().insert(key, value);
        self.committed.set(false);
    }

    fn remove_value(&self, key: &str, flags: WriteFlags) -> bool {
        let removed = self.prefs.borrow_mut().remove(key).is_some();
        if removed {
            self.report_value_changed(key, flags);
        }
        removed
    }

    fn remove_values_by_prefix_silently(&self, prefix: &str) -> usize {
        let removed = self.prefs.borrow_mut().remove_by_prefix(prefix);
        if removed > 0 {
            self.committed.set(false);
        }
        removed
    }

    fn clear_mutable_values(&self) {
        self.prefs.borrow_mut().clear();
        self.committed.set(false);
    }

    fn read_only(&self) -> bool {
        self.read_only.get()
    }

    fn get_read_error(&self) -> ReadError {
        self.read_error.get()
    }

    fn read_prefs(&self) -> ReadError {
        self.read_error.get()
    }

    fn read_prefs_async(&self, delegate: Option<Box<dyn ReadErrorDelegate>>) {
        assert!(
            !self.pending_async_read.get(),
            "read_prefs_async called while a read is already pending"
        );
        if self.block_async_read.get() {
            *self.error_delegate.borrow_mut() = delegate;
            self.pending_async_read.set(true);
        } else if !self.read_success.get() {
            if let Some(delegate) = delegate {
                delegate.on_error(self.read_error.get());
            }
        }
        // Non-blocking success: the delegate is dropped uninvoked.
    }

    fn commit_pending_write(
        &self,
        done: Option<Box<dyn FnOnce()>>,
        sync_done: Option<Box<dyn FnOnce()>>,
    ) {
        self.committed.set(true);
        if let Some(callback) = sync_done {
            callback();
        }
        if let Some(callback) = done {
            callback();
        }
    }

    fn schedule_pending_lossy_writes(&self) {
        // Lossy writes are never deferred in this simulation.
    }

    fn on_store_deletion_from_disk(&self) {
        // Same as clear_mutable_values: a silent mutation.
        self.clear_mutable_values();
    }
}
