//! A map of lazily initialized values

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// A concurrent map where each value is computed at most once.
///
/// The map lock is only held long enough to find or insert the cell for a
/// key; the value itself is computed while holding only that cell. If several
/// threads ask for the same missing key at once, exactly one of them runs the
/// initializer and the rest block until it finishes, then observe the same
/// value.
///
/// Initializers may call back into the map for *other* keys. Asking for the
/// key currently being initialized from inside its own initializer will
/// deadlock.
pub(crate) struct OnceMap<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceLock<V>>>>,
}

impl<K, V> Default for OnceMap<K, V> {
    fn default() -> Self {
        OnceMap {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Copy, V: Clone> OnceMap<K, V> {
    /// Returns the value for `key`, computing it with `init` if needed.
    pub fn get_or_init(&self, key: K, init: impl FnOnce() -> V) -> V {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            cells.entry(key).or_default().clone()
        };
        cell.get_or_init(init).clone()
    }

    /// Returns the value for `key` if it has already been computed.
    pub fn get(&self, key: K) -> Option<V> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.get(&key).and_then(|cell| cell.get()).cloned()
    }

    /// The keys with a computed value.
    pub fn initialized_keys(&self) -> Vec<K> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(key, _)| *key)
            .collect()
    }
}
