//! Observable in-memory preference store.
//!
//! A key/value configuration store keyed by dotted paths (e.g.
//! `browser.window.width`) that notifies registered observers of value
//! changes and initialization completion, and emulates a persistent
//! backing store without doing any I/O: read outcomes are injectable,
//! asynchronous reads can be parked and completed on demand, and a
//! committed flag tracks divergence from the simulated backing.
//!
//! The crate ships one concrete store, [`MemoryPrefStore`], behind the
//! [`PrefStore`]/[`PersistentPrefStore`] trait seam, plus recording
//! test-doubles for driving it in tests.

pub mod error;
pub mod store;

pub use error::ReadError;
pub use store::map::{PrefValueMap, StoreValue};
pub use store::memory::MemoryPrefStore;
pub use store::observer::{ObserverRegistry, PrefObserver, ReadErrorDelegate};
pub use store::{PersistentPrefStore, PrefStore, WriteFlags};
