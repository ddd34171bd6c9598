//! Flat value map keyed by dotted path strings.
//!
//! In-memory key-value map using `serde_json::Value` for typed values.
//! Keys are unique dotted paths like `browser.window.width`; the map is
//! unordered. Bulk removal by prefix respects path-segment boundaries,
//! so `"a"` covers `a` and `a.x` but never `ab.x`.

use std::collections::HashMap;

use serde_json::Value;

/// Alias for stored values. `serde_json::Value` covers all supported
/// value kinds: string, integer, boolean, and opaque structured data.
pub type StoreValue = Value;

/// Flat map from dotted path strings to values.
#[derive(Debug, Clone, Default)]
pub struct PrefValueMap {
    /// All entries, keyed by full dotted path string.
    data: HashMap<String, StoreValue>,
}

impl PrefValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        PrefValueMap {
            data: HashMap::new(),
        }
    }

    /// Look up a value by exact key.
    pub fn get(&self, key: &str) -> Option<&StoreValue> {
        self.data.get(key)
    }

    /// Look up a value by exact key for in-place mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut StoreValue> {
        self.data.get_mut(key)
    }

    /// Insert a value, overwriting any existing entry for the key.
    pub fn insert(&mut self, key: &str, value: StoreValue) {
        self.data.insert(key.to_string(), value);
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<StoreValue> {
        self.data.remove(key)
    }

    /// Remove every key covered by `prefix` at a path-segment boundary.
    ///
    /// A key matches if it starts with the prefix and the match ends at
    /// a segment boundary: prefix `"a"` covers `a` and `a.x` but not
    /// `ab.x`; prefix `"a."` covers `a.x` but not the exact key `a`.
    /// Returns the number of keys removed.
    pub fn remove_by_prefix(&mut self, prefix: &str) -> usize {
        let before = self.data.len();
        self.data.retain(|key, _| !prefix_covers(prefix, key));
        before - self.data.len()
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Structural copy of all entries. Not a live view; later mutation
    /// of the map does not affect the returned snapshot.
    pub fn snapshot(&self) -> HashMap<String, StoreValue> {
        self.data.clone()
    }
}

/// Whether `prefix` covers `key` at a path-segment boundary.
fn prefix_covers(prefix: &str, key: &str) -> bool {
    if prefix.is_empty() {
        // Empty prefix covers everything.
        return true;
    }
    if prefix.ends_with('.') {
        // The trailing dot is the segment boundary itself; the exact key
        // `a` does not start with `a.` and is spared.
        return key.starts_with(prefix);
    }
    match key.strip_prefix(prefix) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_and_get() {
        let mut map = PrefValueMap::new();
        map.insert("browser.homepage", json!("https://example.com"));
        assert_eq!(
            map.get("browser.homepage"),
            Some(&json!("https://example.com"))
        );
        assert_eq!(map.get("browser.missing"), None);
    }

    #[test]
    fn insert_overwrites() {
        let mut map = PrefValueMap::new();
        map.insert("ui.zoom", json!(100));
        map.insert("ui.zoom", json!(125));
        assert_eq!(map.get("ui.zoom"), Some(&json!(125)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut map = PrefValueMap::new();
        map.insert("session.tabs", json!(["a"]));
        let v = map.get_mut("session.tabs").unwrap();
        v.as_array_mut().unwrap().push(json!("b"));
        assert_eq!(map.get("session.tabs"), Some(&json!(["a", "b"])));
        assert!(map.get_mut("session.missing").is_none());
    }

    #[test]
    fn remove_returns_old_value() {
        let mut map = PrefValueMap::new();
        map.insert("a.x", json!(1));
        assert_eq!(map.remove("a.x"), Some(json!(1)));
        assert_eq!(map.remove("a.x"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn prefix_removal_respects_segment_boundary() {
        let mut map = PrefValueMap::new();
        map.insert("a", json!(0));
        map.insert("a.x", json!(1));
        map.insert("a.y", json!(2));
        map.insert("ab.z", json!(3));
        let removed = map.remove_by_prefix("a");
        assert_eq!(removed, 3);
        assert_eq!(map.get("ab.z"), Some(&json!(3)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn prefix_with_trailing_dot() {
        let mut map = PrefValueMap::new();
        map.insert("a.x", json!(1));
        map.insert("a.y", json!(2));
        map.insert("b.z", json!(3));
        assert_eq!(map.remove_by_prefix("a."), 2);
        assert_eq!(map.snapshot(), HashMap::from([("b.z".to_string(), json!(3))]));
    }

    #[test]
    fn trailing_dot_prefix_spares_exact_key() {
        let mut map = PrefValueMap::new();
        map.insert("a", json!(0));
        map.insert("a.x", json!(1));
        assert_eq!(map.remove_by_prefix("a."), 1);
        assert_eq!(map.get("a"), Some(&json!(0)));
        assert_eq!(map.get("a.x"), None);
    }

    #[test]
    fn prefix_miss_removes_nothing() {
        let mut map = PrefValueMap::new();
        map.insert("a.x", json!(1));
        assert_eq!(map.remove_by_prefix("c"), 0);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn snapshot_is_detached() {
        let mut map = PrefValueMap::new();
        map.insert("k", json!(true));
        let snap = map.snapshot();
        map.insert("k", json!(false));
        map.insert("k2", json!(0));
        assert_eq!(snap.len(), 1);
        assert_eq!(snap["k"], json!(true));
    }

    #[test]
    fn clear_empties_map() {
        let mut map = PrefValueMap::new();
        map.insert("a", json!(1));
        map.insert("b", json!(2));
        map.clear();
        assert!(map.is_empty());
    }
}
