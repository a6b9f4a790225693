//! Blob persistence for session state
//!
//! The session store reads and writes the full session list as a single
//! serialized blob under a well-known key. This module provides the
//! key-value seam (`BlobStore`) plus two implementations: an embedded
//! `sled` database for real use and an in-memory map for tests and
//! ephemeral runs.

use crate::error::{ParleyError, Result};
use sled::Db;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Well-known key under which the serialized session list lives
pub const SESSIONS_KEY: &str = "chat_sessions";

/// Byte-blob key-value persistence facility
///
/// The contract is deliberately small: `get` returns the stored bytes if
/// present, `set` replaces them. Implementations must make `set` durable
/// before returning.
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, if any
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Storage` if the underlying read fails.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous blob
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Storage` if the write or flush fails.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Sled-backed blob store
///
/// Opens (or creates) an embedded database directory and flushes after
/// every write so session state survives abrupt process exits.
pub struct SledBlobStore {
    db: Db,
}

impl SledBlobStore {
    /// Open or create a blob store at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the database directory
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use parley::session::SledBlobStore;
    ///
    /// # fn main() -> parley::error::Result<()> {
    /// let store = SledBlobStore::new("/tmp/parley-sessions")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| ParleyError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl BlobStore for SledBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| ParleyError::Storage(format!("Get failed: {}", e)))?;
        Ok(value.map(|ivec| ivec.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value)
            .map_err(|e| ParleyError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| ParleyError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }
}

impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        (**self).set(key, value)
    }
}

/// In-memory blob store
///
/// Holds blobs in a mutex-guarded map. Used by tests and by callers that
/// want a session store without touching disk.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty in-memory blob store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a blob under `key`
    pub fn with_blob(key: &str, value: Vec<u8>) -> Self {
        let store = Self::new();
        store
            .blobs
            .lock()
            .expect("blob map lock poisoned")
            .insert(key.to_string(), value);
        store
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| ParleyError::Storage("Blob map lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| ParleyError::Storage("Blob map lock poisoned".to_string()))?;
        blobs.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_missing_returns_none() {
        let store = MemoryBlobStore::new();
        assert!(store.get(SESSIONS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_set_then_get() {
        let store = MemoryBlobStore::new();
        store.set(SESSIONS_KEY, b"[]").unwrap();
        assert_eq!(store.get(SESSIONS_KEY).unwrap(), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_memory_store_set_replaces() {
        let store = MemoryBlobStore::new();
        store.set(SESSIONS_KEY, b"old").unwrap();
        store.set(SESSIONS_KEY, b"new").unwrap();
        assert_eq!(store.get(SESSIONS_KEY).unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn test_memory_store_with_blob_seeds_value() {
        let store = MemoryBlobStore::with_blob(SESSIONS_KEY, b"seed".to_vec());
        assert_eq!(store.get(SESSIONS_KEY).unwrap(), Some(b"seed".to_vec()));
    }

    #[test]
    fn test_sled_store_round_trip() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let store = SledBlobStore::new(temp_dir.path().join("db")).expect("Failed to open store");

        assert!(store.get(SESSIONS_KEY).unwrap().is_none());
        store.set(SESSIONS_KEY, b"payload").unwrap();
        assert_eq!(store.get(SESSIONS_KEY).unwrap(), Some(b"payload".to_vec()));
    }

    #[test]
    fn test_sled_store_persists_across_reopen() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("db");

        {
            let store = SledBlobStore::new(&db_path).expect("Failed to open store");
            store.set(SESSIONS_KEY, b"durable").unwrap();
        }

        let reopened = SledBlobStore::new(&db_path).expect("Failed to reopen store");
        assert_eq!(
            reopened.get(SESSIONS_KEY).unwrap(),
            Some(b"durable".to_vec())
        );
    }

    #[test]
    fn test_blob_store_is_object_safe() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn BlobStore>();
    }
}
