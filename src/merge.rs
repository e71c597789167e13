//! The record merger.
//!
//! Applies an [`UpdatePatch`] onto a [`RecordStore`] in place. Every patched
//! ID must already exist in the store; the merger never creates records.
//!
//! # Semantics
//!
//! - Entries are applied in patch order and the merge stops at the first ID
//!   that is missing from the store. Entries merged before the failure stay
//!   applied; the caller is expected to discard the store rather than persist.
//! - Each patched field overwrites the record's field of the same name, or is
//!   appended when absent. Lists are replaced wholesale, never concatenated.
//! - Every write is an overwrite, so applying a patch twice is the same as
//!   applying it once.

use tracing::debug;

use crate::error::ReferentialIntegrityError;
use crate::patch::{RecordPatch, UpdatePatch};
use crate::record::{Record, RecordId, RecordStore};

/// Per-field outcome counts for a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Fields the record did not have before.
    pub created: usize,
    /// Fields whose value changed.
    pub overwritten: usize,
    /// Fields that already held the patched value.
    pub unchanged: usize,
}

impl FieldStats {
    /// Fields whose stored value is different after the merge.
    #[must_use]
    pub const fn changed(&self) -> usize {
        self.created + self.overwritten
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.created + self.overwritten + self.unchanged
    }

    fn absorb(&mut self, other: Self) {
        self.created += other.created;
        self.overwritten += other.overwritten;
        self.unchanged += other.unchanged;
    }
}

/// Summary of a completed merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Number of patch entries applied.
    pub records_touched: usize,
    /// Field outcome totals.
    pub fields: FieldStats,
    /// Records whose contents actually changed, in patch order.
    pub changed_ids: Vec<RecordId>,
}

impl MergeReport {
    /// True when the merge left every record as it was.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.fields.changed() == 0
    }

    fn record(&mut self, id: &RecordId, stats: FieldStats) {
        self.records_touched += 1;
        if stats.changed() > 0 {
            self.changed_ids.push(id.clone());
        }
        self.fields.absorb(stats);
    }
}

/// Applies update patches onto a record store.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordMerger;

impl RecordMerger {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Merges `patch` into `store` in place.
    ///
    /// # Errors
    /// Returns [`ReferentialIntegrityError`] for the first patch ID not present
    /// in the store. Earlier entries remain applied.
    pub fn apply(
        &self,
        store: &mut RecordStore,
        patch: &UpdatePatch,
    ) -> Result<MergeReport, ReferentialIntegrityError> {
        let mut report = MergeReport::default();

        for (id, fields) in patch.iter() {
            let Some(record) = store.get_mut(id.as_str()) else {
                return Err(ReferentialIntegrityError::new(id.clone()));
            };

            let stats = Self::apply_record(record, fields);
            debug!(
                record_id = %id,
                created = stats.created,
                overwritten = stats.overwritten,
                unchanged = stats.unchanged,
                "merged record patch"
            );
            report.record(id, stats);
        }

        Ok(report)
    }

    /// Overwrites one record's fields with the patch values.
    pub fn apply_record(record: &mut Record, fields: &RecordPatch) -> FieldStats {
        let mut stats = FieldStats::default();

        for (name, value) in fields.iter() {
            match record.set(name, value.clone()) {
                None => stats.created += 1,
                Some(previous) if previous == *value => stats.unchanged += 1,
                Some(_) => stats.overwritten += 1,
            }
        }

        stats
    }

    /// Every patch ID that is absent from the store, in patch order.
    ///
    /// Read-only; used to report the full extent of a bad update set after
    /// [`RecordMerger::apply`] has failed on the first one.
    #[must_use]
    pub fn missing_ids(store: &RecordStore, patch: &UpdatePatch) -> Vec<RecordId> {
        patch
            .ids()
            .filter(|id| !store.contains(id.as_str()))
            .cloned()
            .collect()
    }
}
