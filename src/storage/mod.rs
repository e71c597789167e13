//! Record store backends.
//!
//! The [`RecordBackend`] trait abstracts whole-store load and persist;
//! implementations live in submodules.

mod codec;
mod json_file;
mod memory;
mod traits;

pub use json_file::{JsonFileStore, DEFAULT_STORE_PATH};
pub use memory::InMemoryRecordStore;
pub use traits::{PersistOutcome, RecordBackend};
