//! Redex DB - redb implementation of storage traits.

pub mod kv_store;
pub mod tables;

pub use kv_store::RedbKeyValueStore;
pub use tables::favorites_key;

use std::path::Path;
use std::sync::Arc;

use redb::Database;

use redex_core::StorageError;

/// Initialize a database with all required tables.
pub fn init_database(path: impl AsRef<Path>) -> Result<Arc<Database>, StorageError> {
    let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

    RedbKeyValueStore::init_tables(&db)?;

    Ok(Arc::new(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use redex_core::KeyValueStore;
    use tempfile::tempdir;

    #[test]
    fn test_init_database() {
        let dir = tempdir().unwrap();
        let db = init_database(dir.path().join("test.redb")).unwrap();

        let store = RedbKeyValueStore::new(db);
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");

        {
            let store = RedbKeyValueStore::new(init_database(&path).unwrap());
            store.set("k", b"[1]").unwrap();
        }

        let store = RedbKeyValueStore::new(init_database(&path).unwrap());
        assert_eq!(store.get("k").unwrap().unwrap(), b"[1]");
    }
}
