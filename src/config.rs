//! Run configuration.
//!
//! The update set is compiled in and never configurable; only where the
//! store lives and whether the result is written back can be chosen.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::storage::{JsonFileStore, DEFAULT_STORE_PATH};

/// Whether a run writes the merged store back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Load, merge, persist.
    #[default]
    Apply,
    /// Load and merge only; the store is left untouched.
    DryRun,
}

impl RunMode {
    #[must_use]
    pub const fn persists(self) -> bool {
        matches!(self, Self::Apply)
    }
}

/// Configuration for a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// Path of the JSON record store.
    pub store_path: PathBuf,
    /// Apply or dry run.
    pub mode: RunMode,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            mode: RunMode::Apply,
        }
    }
}

impl MergeConfig {
    /// Checks the configuration before any I/O happens.
    ///
    /// A missing store file is not a configuration error; it surfaces as a
    /// load error when the run starts.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.store_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyStorePath);
        }

        if self.store_path.is_dir() {
            return Err(ConfigError::StorePathIsDirectory {
                path: self.store_path,
            });
        }

        Ok(self)
    }

    /// The file backend for the configured path.
    #[must_use]
    pub fn backend(&self) -> JsonFileStore {
        JsonFileStore::new(&self.store_path)
    }
}
