//! # refmerge - curated record updates for the reference atlas
//!
//! refmerge applies a fixed set of partial record updates onto the atlas
//! reference store (`public/reference.json`): every region keyed by ID gains
//! or refreshes its description, aliases, functions and connections.
//!
//! ## Core Concepts
//!
//! - **Record**: a named entity with an open-ended set of text / text-list fields
//! - **Record Store**: every record, keyed by ID; loaded once, persisted once
//! - **Update Patch**: record ID → fields to overwrite
//! - **Record Merger**: applies a patch in place, failing fast on unknown IDs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use refmerge::{
//!     InMemoryRecordStore, MergeEngine, RecordPatch, RunMode, StaticUpdates, UpdatePatch,
//! };
//!
//! let patch = UpdatePatch::new()
//!     .record("1", RecordPatch::new().text("description", "foo").list("aliases", ["A", "B"]));
//!
//! let engine = MergeEngine::new(
//!     Arc::new(InMemoryRecordStore::with_store(&store)?),
//!     Arc::new(StaticUpdates::new(patch)),
//! );
//! let summary = engine.run(RunMode::Apply)?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod patch;
pub mod record;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use config::{MergeConfig, RunMode};
pub use engine::{MergeEngine, RunSummary};
pub use error::{
    ConfigError, MergeError, MergeResult, PatchError, ReferentialIntegrityError, StoreLoadError,
    StorePersistError,
};
pub use merge::{FieldStats, MergeReport, RecordMerger};
pub use patch::{EmbeddedUpdates, RecordPatch, StaticUpdates, UpdatePatch, UpdateSource};
pub use record::{FieldValue, Record, RecordId, RecordStore};
pub use storage::{
    InMemoryRecordStore, JsonFileStore, PersistOutcome, RecordBackend, DEFAULT_STORE_PATH,
};
