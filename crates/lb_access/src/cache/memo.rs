use core::hash::Hash;
use std::sync::{PoisonError, RwLock};

use lb_utils::hash::hashbrown::Equivalent;
use lb_utils::hash::hashbrown::hash_map::Entry;
use lb_utils::hash::{FixedHashState, HashMap};

use crate::AccessError;

/// An append-only, thread-safe map.
///
/// Readers proceed in parallel. The write lock is only taken to insert a
/// finished value, and an existing value is never replaced.
pub(crate) struct Memo<K, V> {
    map: RwLock<HashMap<K, V>>,
}

impl<K: Hash + Eq, V: Clone> Memo<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::with_hasher(FixedHashState)),
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K> + ?Sized,
    {
        // Values are inserted whole, so a poisoned map is still consistent.
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).cloned()
    }

    /// Stores `value` unless `key` already has one, and returns the stored value.
    pub(crate) fn insert(&self, key: K, value: V) -> V {
        let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
        match map.entry(key) {
            Entry::Occupied(entry) => {
                log::trace!("entry was stored concurrently, dropping the new one");
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(value).clone(),
        }
    }

    /// Returns the stored value of `key`, building and storing it first if absent.
    ///
    /// Failures are returned as-is and nothing is stored.
    pub(crate) fn get_or_try_insert(
        &self,
        key: &K,
        build: impl FnOnce() -> Result<V, AccessError>,
    ) -> Result<V, AccessError>
    where
        K: Clone,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = build()?;
        Ok(self.insert(key.clone(), value))
    }

    pub(crate) fn len(&self) -> usize {
        self.map.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Memo;
    use crate::AccessError;

    #[test]
    fn first_insert_wins() {
        let memo: Memo<u32, &str> = Memo::new();
        assert_eq!(memo.insert(1, "first"), "first");
        assert_eq!(memo.insert(1, "second"), "first");
        assert_eq!(memo.get(&1), Some("first"));
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn failures_are_not_stored() {
        let memo: Memo<u32, u32> = Memo::new();
        let failed = memo.get_or_try_insert(&7, || {
            Err(AccessError::NoSetter {
                member: String::from("x"),
            })
        });
        assert!(failed.is_err());
        assert_eq!(memo.len(), 0);
        assert_eq!(memo.get_or_try_insert(&7, || Ok(49)), Ok(49));
        assert_eq!(memo.get_or_try_insert(&7, || Ok(0)), Ok(49));
    }
}
