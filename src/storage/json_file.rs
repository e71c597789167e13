//! JSON file backend.
//!
//! The whole store lives in one human-readable JSON document. Persisting
//! rewrites it in full using a write-to-temp-then-rename pattern, so a crash
//! mid-write leaves either the old document or the new one, never a
//! truncated mix.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Result as IoResult, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{StoreLoadError, StorePersistError};
use crate::record::RecordStore;
use crate::storage::codec;
use crate::storage::traits::{PersistOutcome, RecordBackend};

/// Default location of the atlas reference document.
pub const DEFAULT_STORE_PATH: &str = "public/reference.json";

/// Record store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    /// The file a persist replaces. A symlinked store path is resolved so the
    /// link survives and the file it points at is rewritten.
    fn write_target(&self) -> IoResult<PathBuf> {
        match fs::canonicalize(&self.path) {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(e),
        }
    }

    fn temp_path(target: &Path) -> IoResult<PathBuf> {
        let Some(file_name) = target.file_name() else {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                "store path has no file name",
            ));
        };
        let mut temp_name = OsString::from(file_name);
        temp_name.push(format!(".tmp.{}", Uuid::new_v4()));
        Ok(target.with_file_name(temp_name))
    }

    /// Flush, fsync, then atomically rename over the target.
    ///
    /// The replaced file's permissions carry over to the new one.
    fn write_atomic(&self, contents: &[u8]) -> IoResult<()> {
        let target = self.write_target()?;
        let temp_path = Self::temp_path(&target)?;
        let permissions = fs::metadata(&target).ok().map(|meta| meta.permissions());

        let result = (|| {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            if let Some(permissions) = permissions {
                file.set_permissions(permissions)?;
            }
            let mut writer = BufWriter::new(file);
            writer.write_all(contents)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            drop(writer);
            fs::rename(&temp_path, &target)
        })();

        if result.is_err() && temp_path.exists() {
            if let Err(e) = fs::remove_file(&temp_path) {
                warn!(path = %temp_path.display(), error = %e, "failed to remove temp store file");
            }
        }
        result
    }

    fn current_contents(&self) -> Option<Vec<u8>> {
        fs::read(&self.path).ok()
    }
}

impl RecordBackend for JsonFileStore {
    fn load(&self) -> Result<RecordStore, StoreLoadError> {
        let bytes = fs::read(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                StoreLoadError::Missing {
                    location: self.location(),
                }
            } else {
                StoreLoadError::Io {
                    location: self.location(),
                    source,
                }
            }
        })?;

        let store = codec::decode(&bytes).map_err(|source| StoreLoadError::Malformed {
            location: self.location(),
            source,
        })?;

        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            records = store.len(),
            "loaded record store"
        );
        Ok(store)
    }

    fn persist(&self, store: &RecordStore) -> Result<PersistOutcome, StorePersistError> {
        let encoded = codec::encode(store)
            .map_err(|source| StorePersistError::Serialization { source })?;
        let unchanged = self.current_contents().as_deref() == Some(encoded.as_slice());

        self.write_atomic(&encoded).map_err(|source| StorePersistError::Io {
            location: self.location(),
            source,
        })?;

        let outcome = PersistOutcome {
            bytes_written: encoded.len(),
            digest: codec::digest(&encoded),
            unchanged,
        };
        debug!(
            path = %self.path.display(),
            bytes = outcome.bytes_written,
            digest = %outcome.digest,
            unchanged = outcome.unchanged,
            "persisted record store"
        );
        Ok(outcome)
    }

    fn describe(&self) -> String {
        self.location()
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}
