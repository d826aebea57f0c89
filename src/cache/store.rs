//! Bounded, insertion-ordered store with FIFO eviction.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// An insertion-ordered map from keys to memoized values.
///
/// Keys are kept in a ring buffer in insertion order next to a hash map of
/// values. When a bound is set, inserting a new key first evicts the *oldest
/// inserted* keys until there is room, so the store never holds more than the
/// bound. Reads do not refresh a key's position: this is FIFO, not LRU.
///
/// A bound of zero stores nothing.
///
/// # Examples
///
/// ```rust
/// use sturdy::cache::FifoStore;
///
/// let mut store = FifoStore::bounded(2);
/// store.insert("a", 1);
/// store.insert("b", 2);
/// assert_eq!(store.get("a"), Some(&1)); // does not protect "a"
/// store.insert("c", 3);
///
/// assert!(!store.contains("a"));
/// assert_eq!(store.keys().collect::<Vec<_>>(), vec![&"b", &"c"]);
/// ```
#[derive(Debug, Clone)]
pub struct FifoStore<K, V> {
    order: VecDeque<K>,
    entries: HashMap<K, V>,
    max_size: Option<usize>,
}

impl<K, V> Default for FifoStore<K, V> {
    fn default() -> Self {
        FifoStore {
            order: VecDeque::new(),
            entries: HashMap::new(),
            max_size: None,
        }
    }
}

impl<K, V> FifoStore<K, V> {
    /// A store without a size bound.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// A store holding at most `max_size` entries.
    pub fn bounded(max_size: usize) -> Self {
        FifoStore {
            order: VecDeque::new(),
            entries: HashMap::new(),
            max_size: Some(max_size),
        }
    }

    /// The configured bound, if any.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}

impl<K, V> FifoStore<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Look up a value without affecting eviction order.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Whether `key` is stored.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Insert a new entry at the end of insertion order, evicting the oldest
    /// entries first if the store is full.
    ///
    /// An existing key keeps its value and position; the new value is dropped.
    /// Returns the evicted keys, oldest first.
    pub fn insert(&mut self, key: K, value: V) -> Vec<K> {
        if self.entries.contains_key(&key) {
            return Vec::new();
        }

        let mut evicted = Vec::new();
        if let Some(max) = self.max_size {
            while self.order.len() >= max {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.entries.remove(&oldest);
                        evicted.push(oldest);
                    }
                    None => break,
                }
            }
            if max == 0 {
                return evicted;
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        evicted
    }
}
