//! On-disk text format for the record store.
//!
//! The store is a single JSON object of objects:
//! - 2-space indentation, one field per line
//! - non-ASCII text written verbatim as UTF-8
//! - record and field order preserved
//! - exactly one trailing newline

use crate::record::RecordStore;

/// Serializes the store to its canonical file contents.
pub fn encode(store: &RecordStore) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = serde_json::to_vec_pretty(store)?;
    out.push(b'\n');
    Ok(out)
}

/// Parses file contents into a store.
///
/// Leading/trailing whitespace is accepted, so files saved by editors with or
/// without a final newline both load.
pub fn decode(bytes: &[u8]) -> Result<RecordStore, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Hex blake3 digest of encoded contents.
#[must_use]
pub fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_encode_layout() {
        let store = RecordStore::new().with_record(
            "1",
            Record::new()
                .with_field("name", "X")
                .with_field("aliases", vec!["A", "B"]),
        );

        let text = String::from_utf8(encode(&store).unwrap()).unwrap();
        let expected = concat!(
            "{\n",
            "  \"1\": {\n",
            "    \"name\": \"X\",\n",
            "    \"aliases\": [\n",
            "      \"A\",\n",
            "      \"B\"\n",
            "    ]\n",
            "  }\n",
            "}\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_encode_keeps_non_ascii() {
        let store = RecordStore::new().with_record(
            "62",
            Record::new().with_field("aliases", vec!["Vicq d’Azyr bundle"]),
        );
        let text = String::from_utf8(encode(&store).unwrap()).unwrap();
        assert!(text.contains("Vicq d’Azyr bundle"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_decode_tolerates_missing_newline() {
        let store = decode(br#"{"1": {"name": "X"}}"#).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode(b"not json").is_err());
        assert!(decode(b"[1, 2]").is_err());
    }

    #[test]
    fn test_digest_is_stable() {
        let a = digest(b"{}\n");
        assert_eq!(a, digest(b"{}\n"));
        assert_ne!(a, digest(b"{}"));
        assert_eq!(a.len(), 64);
    }
}
