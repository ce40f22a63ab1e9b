//! Event-name → callback list map with stable insertion order.

use std::hash::Hash;

use indexmap::IndexMap;

#[derive(Clone, Debug)]
pub struct ListenerMap<K: Hash + Eq, L> {
    map: IndexMap<K, Vec<L>>,
}

impl<K: Hash + Eq, L> Default for ListenerMap<K, L> {
    fn default() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, L> ListenerMap<K, L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `listener` after those already registered for `key`.
    pub fn on(&mut self, key: K, listener: L) {
        self.map.entry(key).or_default().push(listener);
    }

    pub fn get(&self, key: &K) -> &[L] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total listeners across all keys.
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in first-registration order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: Hash + Eq, L: Clone> ListenerMap<K, L> {
    /// Owned copy of the listeners for `key`, so they can be invoked while the
    /// map itself is free to change.
    pub fn snapshot(&self, key: &K) -> Vec<L> {
        self.get(key).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_registration_order() {
        let mut map: ListenerMap<&str, u32> = ListenerMap::new();
        map.on("tap", 1);
        map.on("swipe", 2);
        map.on("tap", 3);
        assert_eq!(map.get(&"tap"), &[1, 3]);
        assert_eq!(map.snapshot(&"swipe"), vec![2]);
        assert!(map.get(&"end").is_empty());
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["tap", "swipe"]);
        assert_eq!(map.len(), 3);
        map.clear();
        assert!(map.is_empty());
    }
}
