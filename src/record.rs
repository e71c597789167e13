//! Record types and the in-memory record store.
//!
//! A record is an open-ended bag of named fields keyed by a stable
//! [`RecordId`]. Field order is insertion order: fields that already exist
//! keep their position when overwritten, new fields are appended.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Stable identifier of a record in the store.
///
/// Stored as text because JSON object keys are always strings; integer keys
/// are normalized to their decimal form.
///
/// # Examples
///
/// ```
/// use refmerge::RecordId;
///
/// assert_eq!(RecordId::from(42u64), RecordId::from("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a record ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

/// Value of a single record field.
///
/// Descriptive fields are either text or an ordered list of text. Anything
/// else found in a store (numbers, nested objects, null) is carried through
/// untouched as [`FieldValue::Other`]; no schema is enforced.
///
/// Decoding goes through [`serde_json::Value`] rather than untagged-enum
/// buffering so numbers keep their exact source text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Self::from_json)
    }
}

impl FieldValue {
    /// Builds a list value from anything yielding string-likes.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Converts an arbitrary JSON value, normalizing text and text lists.
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(s) => Self::Text(s),
            Value::Array(items) if items.iter().all(Value::is_string) => Self::List(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            other => Self::Other(other),
        }
    }

    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Other(_) => "other",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self {
        Self::list(v)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        Self::from_json(v)
    }
}

/// A named entity with an extensible set of descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field, returning the previous value if the field existed.
    ///
    /// An existing field keeps its position; a new field is appended.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in stored order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The full collection of records, keyed by ID in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: IndexMap<RecordId, Record>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_record(mut self, id: impl Into<RecordId>, record: Record) -> Self {
        self.insert(id, record);
        self
    }

    /// Inserts a record, returning the one it replaced.
    pub fn insert(&mut self, id: impl Into<RecordId>, record: Record) -> Option<Record> {
        self.records.insert(id.into(), record)
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
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

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &Record)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_integer_normalization() {
        assert_eq!(RecordId::from(7u32).as_str(), "7");
        assert_eq!(RecordId::from(141u64), RecordId::new("141"));
    }

    #[test]
    fn test_field_value_untagged_decoding() {
        let text: FieldValue = serde_json::from_str(r#""Piriform area""#).unwrap();
        assert!(text.is_text());

        let list: FieldValue = serde_json::from_str(r#"["A", "B"]"#).unwrap();
        assert_eq!(list.as_list().unwrap(), ["A".to_string(), "B".to_string()]);

        let other: FieldValue = serde_json::from_str("12").unwrap();
        assert_eq!(other.type_name(), "other");

        let mixed: FieldValue = serde_json::from_str(r#"["A", 1]"#).unwrap();
        assert_eq!(mixed.type_name(), "other");
    }

    #[test]
    fn test_field_value_from_json_normalizes() {
        assert_eq!(FieldValue::from(serde_json::json!("x")), FieldValue::from("x"));
        assert_eq!(
            FieldValue::from(serde_json::json!(["a", "b"])),
            FieldValue::from(vec!["a", "b"])
        );
        assert!(matches!(FieldValue::from(serde_json::json!(null)), FieldValue::Other(_)));
    }

    #[test]
    fn test_record_set_keeps_position_of_existing_field() {
        let mut record = Record::new()
            .with_field("name", "Insula")
            .with_field("description", "old");

        let prev = record.set("name", "Insular cortex");
        assert_eq!(prev, Some(FieldValue::from("Insula")));

        record.set("aliases", vec!["Island of Reil"]);
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, ["name", "description", "aliases"]);

        let (last_name, last_value) = record.iter().last().unwrap();
        assert_eq!(last_name, "aliases");
        assert!(last_value.is_list());
    }

    #[test]
    fn test_store_preserves_file_order() {
        let json = r#"{"10": {"name": "J"}, "2": {"name": "B"}, "1": {"name": "A"}}"#;
        let store: RecordStore = serde_json::from_str(json).unwrap();
        let ids: Vec<_> = store.ids().map(RecordId::as_str).collect();
        assert_eq!(ids, ["10", "2", "1"]);
        let names: Vec<_> = store
            .iter()
            .map(|(id, record)| (id.as_str(), record.get("name").unwrap().as_text().unwrap()))
            .collect();
        assert_eq!(names, [("10", "J"), ("2", "B"), ("1", "A")]);
        assert!(store.contains("2"));
        assert_eq!(store.get("1").unwrap().get("name").unwrap().as_text(), Some("A"));
    }

    #[test]
    fn test_store_rejects_non_object_records() {
        let result: Result<RecordStore, _> = serde_json::from_str(r#"{"1": "not a record"}"#);
        assert!(result.is_err());
    }
}
