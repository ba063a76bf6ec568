use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// Key/value store abstraction backing options, metadata, sessions and nonces.
pub trait KvStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V);
    /// Insert only when `key` is vacant. Returns whether the insert happened.
    fn insert_if_absent(&self, key: K, value: V) -> bool;
    fn remove(&self, key: &K) -> Option<V>;
    /// Drop every entry for which `keep` returns false.
    fn retain(&self, keep: &dyn Fn(&K, &V) -> bool);
}

impl<K, V, S> KvStore<K, V> for Arc<S>
where
    S: KvStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) {
        (**self).upsert(key, value)
    }

    fn insert_if_absent(&self, key: K, value: V) -> bool {
        (**self).insert_if_absent(key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        (**self).remove(key)
    }

    fn retain(&self, keep: &dyn Fn(&K, &V) -> bool) {
        (**self).retain(keep)
    }
}

/// In-memory store for tests/dev.
///
/// A poisoned lock reads as empty and drops writes rather than panicking the
/// request that happens to observe it.
#[derive(Debug)]
pub struct InMemoryKvStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryKvStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryKvStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> KvStore<K, V> for InMemoryKvStore<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn insert_if_absent(&self, key: K, value: V) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        if map.contains_key(&key) {
            return false;
        }
        map.insert(key, value);
        true
    }

    fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().ok()?.remove(key)
    }

    fn retain(&self, keep: &dyn Fn(&K, &V) -> bool) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|k, v| keep(k, v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_if_absent_never_overwrites() {
        let store: InMemoryKvStore<&'static str, u32> = InMemoryKvStore::new();
        assert!(store.insert_if_absent("a", 1));
        assert!(!store.insert_if_absent("a", 2));
        assert_eq!(store.get(&"a"), Some(1));
    }

    #[test]
    fn retain_drops_rejected_entries() {
        let store: Arc<InMemoryKvStore<u8, &'static str>> = Arc::new(InMemoryKvStore::new());
        store.upsert(1u8, "keep");
        store.upsert(2u8, "drop");

        store.retain(&|_, v| *v == "keep");

        assert_eq!(store.get(&1), Some("keep"));
        assert_eq!(store.get(&2), None);
        assert_eq!(store.remove(&1), Some("keep"));
        assert_eq!(store.get(&1), None);
    }
}
