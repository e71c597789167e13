//! Partial record updates and where they come from.
//!
//! An [`UpdatePatch`] maps record IDs to [`RecordPatch`]es, each a set of
//! fields to write onto an existing record. Patches are fully known before a
//! merge starts; an [`UpdateSource`] hands one over.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::PatchError;
use crate::record::{FieldValue, RecordId};

/// Curated descriptions, aliases, functions and connections for atlas regions.
const REFERENCE_UPDATES: &str = include_str!("../data/reference_updates.json");

/// Fields to overwrite or create on a single record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordPatch {
    fields: IndexMap<String, FieldValue>,
}

impl RecordPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to an arbitrary value.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets a text field.
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field(name, FieldValue::Text(value.into()))
    }

    /// Sets a list-of-text field.
    #[must_use]
    pub fn list<I, S>(self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field(name, FieldValue::list(items))
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Record ID → fields to write, applied in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdatePatch {
    records: IndexMap<RecordId, RecordPatch>,
}

impl UpdatePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the patch for one record.
    #[must_use]
    pub fn record(mut self, id: impl Into<RecordId>, patch: RecordPatch) -> Self {
        self.records.insert(id.into(), patch);
        self
    }

    /// Parses an update set from a JSON object of objects.
    ///
    /// # Errors
    /// Returns [`PatchError::Malformed`] if the text is not a JSON object whose
    /// values are objects.
    pub fn from_json_str(json: &str) -> Result<Self, PatchError> {
        serde_json::from_str(json).map_err(|source| PatchError::Malformed { source })
    }

    pub fn get(&self, id: &str) -> Option<&RecordPatch> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.records.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &RecordPatch)> {
        self.records.iter()
    }

    /// Total number of field writes across all records.
    pub fn field_count(&self) -> usize {
        self.records.values().map(RecordPatch::len).sum()
    }
}

/// Supplies the update set for a run.
pub trait UpdateSource: Send + Sync {
    /// Returns the full update set.
    fn updates(&self) -> Result<UpdatePatch, PatchError>;

    /// Short label used in logs.
    fn name(&self) -> &str;
}

/// An update set built in code.
#[derive(Debug, Clone, Default)]
pub struct StaticUpdates {
    patch: UpdatePatch,
}

impl StaticUpdates {
    #[must_use]
    pub fn new(patch: UpdatePatch) -> Self {
        Self { patch }
    }
}

impl UpdateSource for StaticUpdates {
    fn updates(&self) -> Result<UpdatePatch, PatchError> {
        Ok(self.patch.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// The reference-atlas update set compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedUpdates;

impl EmbeddedUpdates {
    /// The raw JSON payload.
    #[must_use]
    pub const fn raw() -> &'static str {
        REFERENCE_UPDATES
    }
}

impl UpdateSource for EmbeddedUpdates {
    fn updates(&self) -> Result<UpdatePatch, PatchError> {
        UpdatePatch::from_json_str(REFERENCE_UPDATES)
    }

    fn name(&self) -> &str {
        "embedded reference updates"
    }
}
