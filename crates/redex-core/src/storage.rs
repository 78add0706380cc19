use crate::error::StorageError;

/// Durable string-keyed byte storage, the server-side stand-in for the
/// browser's local storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`. Returns Ok(None) if the key was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

// In-memory implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::RwLock;

    /// In-memory key-value store for testing.
    #[derive(Default)]
    pub struct InMemoryKeyValueStore {
        values: RwLock<HashMap<String, Vec<u8>>>,
        fail_writes: AtomicBool,
    }

    impl InMemoryKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent `set` fail, as a full or disabled storage would.
        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        /// Store raw bytes directly, bypassing any encoding.
        pub fn put_raw(&self, key: &str, value: &[u8]) {
            self.values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(self.values.read().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Database("quota exceeded".to_string()));
            }
            self.values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }
    }

}
