//! Abstract record store backend.
//!
//! The merger only needs two operations from a store: load everything and
//! persist everything. Backends:
//! - [`InMemoryRecordStore`](super::InMemoryRecordStore) for tests and embedding
//! - [`JsonFileStore`](super::JsonFileStore) for the atlas file on disk

use crate::error::{StoreLoadError, StorePersistError};
use crate::record::RecordStore;

/// What a successful persist wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Size of the encoded store.
    pub bytes_written: usize,
    /// Hex blake3 digest of the encoded store.
    pub digest: String,
    /// True when the new contents are byte-identical to the previous ones.
    pub unchanged: bool,
}

/// Storage trait for whole-store load and persist.
pub trait RecordBackend: Send + Sync {
    /// Load every record.
    ///
    /// # Errors
    /// - `Missing`: nothing has been stored yet
    /// - `Io` / `Malformed`: the stored document is unreadable
    fn load(&self) -> Result<RecordStore, StoreLoadError>;

    /// Replace the stored document with `store`, in full.
    fn persist(&self, store: &RecordStore) -> Result<PersistOutcome, StorePersistError>;

    /// Where the records live, for logs and error messages.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test: ensure the trait is object-safe
    fn _assert_record_backend_object_safe(_: &dyn RecordBackend) {}

    #[test]
    fn test_persist_outcome_equality() {
        let a = PersistOutcome {
            bytes_written: 3,
            digest: "ab".to_string(),
            unchanged: false,
        };
        assert_eq!(a.clone(), a);
    }
}
