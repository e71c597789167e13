//! Error types for refmerge.
//!
//! All errors are strongly typed using thiserror so callers can match on the
//! exact failure. Every error is fatal for a run: nothing is retried or
//! recovered internally.

use std::path::PathBuf;

use thiserror::Error;

use crate::record::RecordId;

/// Errors raised while loading the record store.
#[derive(Debug, Error)]
pub enum StoreLoadError {
    #[error("Record store not found at {location}")]
    Missing {
        location: String,
    },

    #[error("Failed to read record store at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Record store at {location} is not well-formed: {source}")]
    Malformed {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Record store backend error: {0}")]
    Backend(String),
}

/// An update references a record that does not exist in the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Update references missing record id {id}")]
pub struct ReferentialIntegrityError {
    /// The ID that was not found.
    pub id: RecordId,
}

impl ReferentialIntegrityError {
    #[must_use]
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self { id: id.into() }
    }
}

/// Errors raised while writing the record store back.
#[derive(Debug, Error)]
pub enum StorePersistError {
    #[error("Failed to write record store at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record store: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    #[error("Record store backend error: {0}")]
    Backend(String),
}

/// Errors raised while reading the update set.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("Update set is not well-formed: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
}

/// Invalid run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Store path cannot be empty")]
    EmptyStorePath,

    #[error("Store path {} is a directory", .path.display())]
    StorePathIsDirectory {
        path: PathBuf,
    },
}

/// Top-level error type for refmerge.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Store load error: {0}")]
    Load(#[from] StoreLoadError),

    #[error("Referential integrity error: {0}")]
    Integrity(#[from] ReferentialIntegrityError),

    #[error("Store persist error: {0}")]
    Persist(#[from] StorePersistError),

    #[error("Update set error: {0}")]
    Patch(#[from] PatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MergeError {
    /// Returns true if the store could not be loaded.
    #[must_use]
    pub const fn is_load(&self) -> bool {
        matches!(self, Self::Load(_))
    }

    /// Returns true if an update referenced a missing record.
    #[must_use]
    pub const fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }

    #[must_use]
    pub const fn is_persist(&self) -> bool {
        matches!(self, Self::Persist(_))
    }

    #[must_use]
    pub const fn is_patch(&self) -> bool {
        matches!(self, Self::Patch(_))
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The missing record ID, for integrity failures.
    #[must_use]
    pub fn missing_id(&self) -> Option<&RecordId> {
        match self {
            Self::Integrity(e) => Some(&e.id),
            _ => None,
        }
    }
}

/// Result type alias for refmerge operations.
pub type MergeResult<T> = Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_missing() {
        let err = StoreLoadError::Missing {
            location: "public/reference.json".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("not found"));
        assert!(msg.contains("public/reference.json"));
    }

    #[test]
    fn test_load_error_malformed_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StoreLoadError::Malformed {
            location: "store.json".to_string(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("not well-formed"));
    }

    #[test]
    fn test_integrity_error_names_id() {
        let err = ReferentialIntegrityError::new("9");
        let msg = format!("{err}");
        assert!(msg.contains("missing record id 9"));
    }

    #[test]
    fn test_config_error_directory() {
        let err = ConfigError::StorePathIsDirectory {
            path: PathBuf::from("/tmp"),
        };
        assert!(err.to_string().contains("/tmp"));
    }

    #[test]
    fn test_merge_error_from_integrity() {
        let err: MergeError = ReferentialIntegrityError::new(9u64).into();
        assert!(err.is_integrity());
        assert!(!err.is_load());
        assert_eq!(err.missing_id().map(RecordId::as_str), Some("9"));
    }

    #[test]
    fn test_merge_error_from_load() {
        let err: MergeError = StoreLoadError::Backend("poisoned".to_string()).into();
        assert!(err.is_load());
        assert!(err.missing_id().is_none());
        assert!(err.to_string().contains("poisoned"));
    }

    #[test]
    fn test_merge_error_classification() {
        let err: MergeError = StorePersistError::Backend("x".to_string()).into();
        assert!(err.is_persist());

        let err: MergeError = ConfigError::EmptyStorePath.into();
        assert!(err.is_config());

        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err: MergeError = PatchError::Malformed { source }.into();
        assert!(err.is_patch());
    }
}
