use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors that can occur during state persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable string key-value storage, shaped like `eframe::Storage`
pub trait KeyValueStore {
    fn get_string(&self, key: &str) -> PersistenceResult<Option<String>>;

    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()>;
}

impl KeyValueStore for dyn eframe::Storage + '_ {
    fn get_string(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(eframe::Storage::get_string(self, key))
    }

    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        eframe::Storage::set_string(self, key, value);
        Ok(())
    }
}

/// In-memory store that remembers which keys changed.
///
/// The app keeps one of these between frames because eframe only lends out
/// its storage during `update` and `save`. Changed keys are written back
/// with [`MemoryStore::flush_into`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    dirty: BTreeSet<String>,
}

impl MemoryStore {
    /// Copy `keys` out of `storage`, skipping the ones it doesn't have
    pub fn from_storage(storage: &dyn eframe::Storage, keys: &[&str]) -> Self {
        let values = keys
            .iter()
            .filter_map(|key| {
                let value = eframe::Storage::get_string(storage, key)?;
                Some((key.to_string(), value))
            })
            .collect();
        Self {
            values,
            dirty: BTreeSet::new(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Write changed keys to `storage` and flush it. Returns whether
    /// anything was written.
    pub fn flush_into(&mut self, storage: &mut dyn eframe::Storage) -> bool {
        if self.dirty.is_empty() {
            return false;
        }
        for key in std::mem::take(&mut self.dirty) {
            if let Some(value) = self.values.get(&key) {
                eframe::Storage::set_string(storage, &key, value.clone());
            }
        }
        eframe::Storage::flush(storage);
        log::debug!("Flushed canvas state to app storage");
        true
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: String) -> PersistenceResult<()> {
        self.values.insert(key.to_owned(), value);
        self.dirty.insert(key.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingStorage {
        values: HashMap<String, String>,
        flushes: usize,
    }

    impl eframe::Storage for RecordingStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.values.insert(key.to_owned(), value);
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }

    #[test]
    fn seeding_copies_only_requested_keys() {
        let mut storage = RecordingStorage::default();
        storage.values.insert("a".into(), "one".into());
        storage.values.insert("other".into(), "x".into());

        let store = MemoryStore::from_storage(&storage, &["a", "b"]);
        assert_eq!(store.get_string("a").unwrap().as_deref(), Some("one"));
        assert_eq!(store.get_string("b").unwrap(), None);
        assert_eq!(store.get_string("other").unwrap(), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn flush_writes_changed_keys_once() {
        let mut storage = RecordingStorage::default();
        storage.values.insert("a".into(), "one".into());
        let mut store = MemoryStore::from_storage(&storage, &["a"]);

        assert!(!store.flush_into(&mut storage));
        assert_eq!(storage.flushes, 0);

        store.set_string("b", "two".to_string()).unwrap();
        assert!(store.is_dirty());
        assert!(store.flush_into(&mut storage));
        assert_eq!(storage.values.get("b").map(String::as_str), Some("two"));
        assert_eq!(storage.values.get("a").map(String::as_str), Some("one"));
        assert_eq!(storage.flushes, 1);

        assert!(!store.is_dirty());
        assert!(!store.flush_into(&mut storage));
        assert_eq!(storage.flushes, 1);
    }

    #[test]
    fn app_storage_is_a_key_value_store() {
        let mut storage = RecordingStorage::default();
        let dynamic: &mut dyn eframe::Storage = &mut storage;
        KeyValueStore::set_string(&mut *dynamic, "k", "v".to_string()).unwrap();
        assert_eq!(
            KeyValueStore::get_string(&*dynamic, "k").unwrap().as_deref(),
            Some("v")
        );
    }
}
