//! Recording test-doubles for store notifications.
//!
//! Records all deliveries and provides controllable behavior, making it
//! easy to write deterministic tests for code driving the store. Used
//! by this crate's own tests and available to downstream test suites.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::ReadError;
use crate::store::memory::MemoryPrefStore;
use crate::store::observer::{PrefObserver, ReadErrorDelegate};
use crate::store::PrefStore;

/// Observer that records every delivery it receives, in order.
#[derive(Default)]
pub struct RecordingObserver {
    /// Changed keys, in delivery order.
    changed: RefCell<Vec<String>>,
    /// Every initialization-completed outcome delivered.
    init_calls: RefCell<Vec<bool>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        RecordingObserver {
            changed: RefCell::new(Vec::new()),
            init_calls: RefCell::new(Vec::new()),
        }
    }

    /// All changed keys delivered so far, in order.
    pub fn changed_keys(&self) -> Vec<String> {
        self.changed.borrow().clone()
    }

    /// How many change notifications were delivered for `key`.
    pub fn change_count_for(&self, key: &str) -> usize {
        self.changed.borrow().iter().filter(|k| *k == key).count()
    }

    /// All initialization outcomes delivered so far, in order.
    pub fn init_calls(&self) -> Vec<bool> {
        self.init_calls.borrow().clone()
    }

    /// Clear all recorded deliveries.
    pub fn clear(&self) {
        self.changed.borrow_mut().clear();
        self.init_calls.borrow_mut().clear();
    }
}

impl PrefObserver for RecordingObserver {
    fn on_pref_value_changed(&self, key: &str) {
        self.changed.borrow_mut().push(key.to_string());
    }

    fn on_initialization_completed(&self, succeeded: bool) {
        self.init_calls.borrow_mut().push(succeeded);
    }
}

/// One-shot delegate that records the delivered error into a shared
/// slot. The slot outlives the delegate, which is consumed on invoke.
#[derive(Default)]
pub struct RecordingDelegate {
    slot: Rc<Cell<Option<ReadError>>>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        RecordingDelegate {
            slot: Rc::new(Cell::new(None)),
        }
    }

    /// Handle to the slot the delivered error will be written into.
    /// Clone it out before handing the delegate to the store.
    pub fn slot(&self) -> Rc<Cell<Option<ReadError>>> {
        self.slot.clone()
    }
}

impl ReadErrorDelegate for RecordingDelegate {
    fn on_error(self: Box<Self>, error: ReadError) {
        self.slot.set(Some(error));
    }
}

/// Observer that deregisters itself from a store during its own
/// value-changed callback. Exercises dispatch safety against
/// mid-notification removal.
pub struct SelfRemovingObserver {
    store: Rc<MemoryPrefStore>,
    self_handle: RefCell<Weak<SelfRemovingObserver>>,
    notified: Cell<usize>,
}

impl SelfRemovingObserver {
    /// Build the observer and register it with `store`.
    pub fn register(store: &Rc<MemoryPrefStore>) -> Rc<Self> {
        let observer = Rc::new(SelfRemovingObserver {
            store: store.clone(),
            self_handle: RefCell::new(Weak::new()),
            notified: Cell::new(0),
        });
        *observer.self_handle.borrow_mut() = Rc::downgrade(&observer);
        store.add_observer(observer.clone());
        observer
    }

    /// How many value-changed notifications reached this observer.
    pub fn notified(&self) -> usize {
        self.notified.get()
    }
}

impl PrefObserver for SelfRemovingObserver {
    fn on_pref_value_changed(&self, _key: &str) {
        self.notified.set(self.notified.get() + 1);
        let me = self.self_handle.borrow().upgrade();
        if let Some(me) = me {
            let me: Rc<dyn PrefObserver> = me;
            self.store.remove_observer(&me);
        }
    }

    fn on_initialization_completed(&self, _succeeded: bool) {}
}
