//! Observer capabilities and the notification registry.
//!
//! The store holds non-owning references to its observers; observers
//! either outlive the store or deregister themselves, possibly from
//! inside their own notification callback. Dispatch therefore snapshots
//! the registered list first and re-checks registration per delivery,
//! so the list is never iterated while it is being mutated.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::ReadError;

/// Capability notified of store changes and initialization completion.
pub trait PrefObserver {
    /// The value stored under `key` changed (or was removed).
    fn on_pref_value_changed(&self, key: &str);

    /// Store initialization finished with the given outcome.
    fn on_initialization_completed(&self, succeeded: bool);
}

/// One-shot capability invoked when a simulated read fails.
///
/// Invocation consumes the delegate, so a held delegate can never be
/// delivered twice.
pub trait ReadErrorDelegate {
    /// The simulated read failed with `error`.
    fn on_error(self: Box<Self>, error: ReadError);
}

/// Registry of observers with dispatch that tolerates mutation mid-pass.
///
/// Guarantees per notification pass:
/// - every observer registered at the start of the pass and still
///   registered at delivery time is notified exactly once;
/// - an observer removed during the pass (including by itself) is not
///   delivered to afterward;
/// - an observer added during the pass is not notified until the next
///   pass.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RefCell<Vec<Weak<dyn PrefObserver>>>,
}

impl ObserverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        ObserverRegistry {
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Register an observer. Adding an already-registered observer is a
    /// no-op; dropped observers are pruned on the way.
    pub fn add(&self, observer: &Rc<dyn PrefObserver>) {
        let mut list = self.observers.borrow_mut();
        list.retain(|weak| weak.upgrade().is_some());
        let present = list
            .iter()
            .any(|weak| weak.upgrade().is_some_and(|o| Rc::ptr_eq(&o, observer)));
        if !present {
            list.push(Rc::downgrade(observer));
        }
    }

    /// Deregister an observer. Removing one that is not registered is a
    /// no-op.
    pub fn remove(&self, observer: &Rc<dyn PrefObserver>) {
        self.observers.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(o) => !Rc::ptr_eq(&o, observer),
            None => false,
        });
    }

    /// Whether any live observer is registered.
    pub fn has_observers(&self) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|weak| weak.upgrade().is_some())
    }

    /// Deliver a value-change notification to all registered observers.
    pub fn notify_value_changed(&self, key: &str) {
        self.dispatch(|observer| observer.on_pref_value_changed(key));
    }

    /// Deliver an initialization-completed notification to all
    /// registered observers.
    pub fn notify_init_completed(&self, succeeded: bool) {
        self.dispatch(|observer| observer.on_initialization_completed(succeeded));
    }

    /// Snapshot-then-dispatch. The borrow is released before any
    /// callback runs, so callbacks may add or remove observers freely.
    fn dispatch(&self, mut deliver: impl FnMut(&dyn PrefObserver)) {
        let pass: Vec<Weak<dyn PrefObserver>> = self.observers.borrow().clone();
        for weak in pass {
            let Some(observer) = weak.upgrade() else {
                continue;
            };
            if !self.is_registered(&observer) {
                continue;
            }
            deliver(observer.as_ref());
        }
    }

    fn is_registered(&self, observer: &Rc<dyn PrefObserver>) -> bool {
        self.observers
            .borrow()
            .iter()
            .any(|weak| weak.upgrade().is_some_and(|o| Rc::ptr_eq(&o, observer)))
    }
}
