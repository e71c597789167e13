//! In-memory storage backend.
//!
//! Thread-safe implementation of [`RecordBackend`] that keeps the encoded
//! document in memory. Intended for tests, embedding, and as a reference
//! implementation of the file backend's contract.

use std::sync::{PoisonError, RwLock};

use crate::error::{StoreLoadError, StorePersistError};
use crate::record::RecordStore;
use crate::storage::codec;
use crate::storage::traits::{PersistOutcome, RecordBackend};

const LOCATION: &str = "<memory>";

fn load_lock_err() -> StoreLoadError {
    StoreLoadError::Backend("poisoned lock: memory store".to_string())
}

fn persist_lock_err() -> StorePersistError {
    StorePersistError::Backend("poisoned lock: memory store".to_string())
}

#[derive(Debug, Default)]
struct MemoryState {
    document: Option<Vec<u8>>,
    persists: usize,
}

/// In-memory record store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: RwLock<MemoryState>,
}

impl InMemoryRecordStore {
    /// Creates an empty store; loading it fails with `Missing` until seeded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `store`.
    ///
    /// # Errors
    /// Fails only if the records cannot be serialized.
    pub fn with_store(store: &RecordStore) -> Result<Self, StorePersistError> {
        let document = codec::encode(store)
            .map_err(|source| StorePersistError::Serialization { source })?;
        Ok(Self {
            state: RwLock::new(MemoryState {
                document: Some(document),
                persists: 0,
            }),
        })
    }

    /// Creates a store holding raw document bytes, valid or not.
    #[must_use]
    pub fn with_document(document: impl Into<Vec<u8>>) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                document: Some(document.into()),
                persists: 0,
            }),
        }
    }

    /// Current document bytes, if any.
    ///
    /// Observers read through a poisoned lock: every write replaces the
    /// state in one assignment, so it is never left half-updated.
    #[must_use]
    pub fn document(&self) -> Option<Vec<u8>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .document
            .clone()
    }

    /// Number of successful persists since creation.
    #[must_use]
    pub fn persist_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .persists
    }
}

impl RecordBackend for InMemoryRecordStore {
    fn load(&self) -> Result<RecordStore, StoreLoadError> {
        let state = self.state.read().map_err(|_| load_lock_err())?;
        let Some(document) = state.document.as_deref() else {
            return Err(StoreLoadError::Missing {
                location: LOCATION.to_string(),
            });
        };
        codec::decode(document).map_err(|source| StoreLoadError::Malformed {
            location: LOCATION.to_string(),
            source,
        })
    }

    fn persist(&self, store: &RecordStore) -> Result<PersistOutcome, StorePersistError> {
        let encoded = codec::encode(store)
            .map_err(|source| StorePersistError::Serialization { source })?;
        let mut state = self.state.write().map_err(|_| persist_lock_err())?;

        let unchanged = state.document.as_deref() == Some(encoded.as_slice());
        let outcome = PersistOutcome {
            bytes_written: encoded.len(),
            digest: codec::digest(&encoded),
            unchanged,
        };

        state.document = Some(encoded);
        state.persists += 1;
        Ok(outcome)
    }

    fn describe(&self) -> String {
        LOCATION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::record::Record;

    #[test]
    fn test_unseeded_load_is_missing() {
        let backend = InMemoryRecordStore::new();
        let err = backend.load().unwrap_err();
        assert!(matches!(err, StoreLoadError::Missing { .. }));
    }

    #[test]
    fn test_garbage_document_is_malformed() {
        let backend = InMemoryRecordStore::with_document("{\"1\": ");
        let err = backend.load().unwrap_err();
        assert!(matches!(err, StoreLoadError::Malformed { .. }));
    }

    #[test]
    fn test_persist_then_load() {
        let backend = InMemoryRecordStore::new();
        let store = RecordStore::new().with_record("1", Record::new().with_field("name", "X"));

        let first = backend.persist(&store).unwrap();
        assert!(!first.unchanged);
        assert_eq!(backend.load().unwrap(), store);

        let second = backend.persist(&store).unwrap();
        assert!(second.unchanged);
        assert_eq!(second.digest, first.digest);
        assert_eq!(backend.persist_count(), 2);
    }

    #[test]
    fn test_seeded_store_loads() {
        let store = RecordStore::new().with_record("5", Record::new().with_field("name", "Insula"));
        let backend = InMemoryRecordStore::with_store(&store).unwrap();
        assert_eq!(backend.load().unwrap(), store);
        assert_eq!(backend.persist_count(), 0);
        assert!(backend.document().unwrap().ends_with(b"}\n"));
    }

    #[test]
    fn test_observers_read_through_poisoned_lock() {
        let backend = Arc::new(InMemoryRecordStore::with_document("{}"));
        let writer = Arc::clone(&backend);
        let joined = thread::spawn(move || {
            let _guard = writer.state.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(backend.persist_count(), 0);
        assert_eq!(backend.document().as_deref(), Some(&b"{}"[..]));
        assert!(matches!(backend.load().unwrap_err(), StoreLoadError::Backend(_)));
    }
}
