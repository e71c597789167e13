//! Merge engine.
//!
//! Drives a single run against pluggable collaborators:
//!
//! ```text
//! UpdateSource ──┐
//!                ├─> RecordMerger ─> RecordBackend::persist
//! RecordBackend::load
//! ```
//!
//! The store is loaded once, merged once and persisted once. Any error aborts
//! the run; in particular a referential integrity failure means nothing is
//! written, even though the in-memory copy may already be partly merged.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{MergeConfig, RunMode};
use crate::error::MergeResult;
use crate::merge::{MergeReport, RecordMerger};
use crate::patch::{EmbeddedUpdates, UpdateSource};
use crate::storage::{PersistOutcome, RecordBackend};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Mode the run executed in.
    pub mode: RunMode,
    /// Number of records in the store.
    pub records_in_store: usize,
    /// What the merge changed.
    pub report: MergeReport,
    /// Set when the store was written back.
    pub persisted: Option<PersistOutcome>,
}

/// Load → merge → persist orchestrator.
pub struct MergeEngine {
    backend: Arc<dyn RecordBackend>,
    source: Arc<dyn UpdateSource>,
    merger: RecordMerger,
}

impl MergeEngine {
    /// Creates an engine over the given store and update source.
    #[must_use]
    pub fn new(backend: Arc<dyn RecordBackend>, source: Arc<dyn UpdateSource>) -> Self {
        Self {
            backend,
            source,
            merger: RecordMerger::new(),
        }
    }

    /// The production wiring: JSON file store at the configured path and the
    /// embedded update set.
    #[must_use]
    pub fn from_config(config: &MergeConfig) -> Self {
        Self::new(Arc::new(config.backend()), Arc::new(EmbeddedUpdates))
    }

    /// Executes one run.
    ///
    /// # Errors
    /// - `Patch`: the update set cannot be read
    /// - `Load`: the store is missing or malformed; nothing is merged
    /// - `Integrity`: an update targets a missing record; nothing is persisted
    /// - `Persist`: the merged store could not be written
    pub fn run(&self, mode: RunMode) -> MergeResult<RunSummary> {
        let location = self.backend.describe();

        let patch = self.source.updates()?;
        info!(
            source = self.source.name(),
            records = patch.len(),
            fields = patch.field_count(),
            "loaded update set"
        );

        let mut store = self.backend.load().map_err(|e| {
            error!(store = %location, error = %e, "failed to load record store");
            e
        })?;
        info!(store = %location, records = store.len(), "loaded record store");

        let report = match self.merger.apply(&mut store, &patch) {
            Ok(report) => report,
            Err(e) => {
                let missing = RecordMerger::missing_ids(&store, &patch);
                error!(
                    store = %location,
                    missing_id = %e.id,
                    missing_total = missing.len(),
                    "update references a record absent from the store; nothing written"
                );
                for id in &missing {
                    debug!(record_id = %id, "missing record");
                }
                return Err(e.into());
            }
        };

        info!(
            records = report.records_touched,
            created = report.fields.created,
            overwritten = report.fields.overwritten,
            unchanged = report.fields.unchanged,
            "merged updates"
        );
        if report.is_noop() {
            info!("store already up to date");
        }

        let persisted = if mode.persists() {
            let outcome = self.backend.persist(&store).map_err(|e| {
                error!(store = %location, error = %e, "failed to persist record store");
                e
            })?;
            info!(
                store = %location,
                bytes = outcome.bytes_written,
                digest = %outcome.digest,
                "persisted record store"
            );
            Some(outcome)
        } else {
            warn!(store = %location, "dry run: record store not written");
            None
        };

        Ok(RunSummary {
            mode,
            records_in_store: store.len(),
            report,
            persisted,
        })
    }
}
