//! Decoding of list fields stored as serialized JSON text.
//!
//! These helpers are the only place serialized lists are parsed. Anything
//! unreadable degrades to an empty list (or `None`) so scoring code never
//! sees a parse error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// NULL, blank, non-JSON, or non-array input all decode to an empty list.
/// Array items that do not fit `T` are skipped.
pub fn decode_list<T: DeserializeOwned>(raw: Option<&str>) -> Vec<T> {
    decode_optional_list(raw).unwrap_or_default()
}

/// Like `decode_list`, but keeps "no data" (`None`) distinct from an empty array.
pub fn decode_optional_list<T: DeserializeOwned>(raw: Option<&str>) -> Option<Vec<T>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        Ok(_) => {
            warn!("Serialized list field is not an array; treating as empty");
            None
        }
        Err(e) => {
            warn!("Serialized list field is not valid JSON ({e}); treating as empty");
            None
        }
    }
}

pub fn encode_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_array() {
        let skills: Vec<String> = decode_list(Some(r#"["Rust", "SQL"]"#));
        assert_eq!(skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_decode_null_and_blank_are_empty() {
        assert!(decode_list::<String>(None).is_empty());
        assert!(decode_list::<String>(Some("   ")).is_empty());
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(decode_list::<String>(Some("Rust, SQL")).is_empty());
        assert!(decode_list::<String>(Some(r#"{"a": 1}"#)).is_empty());
        assert!(decode_list::<String>(Some("\"Rust\"")).is_empty());
    }

    #[test]
    fn test_decode_skips_mismatched_items() {
        let skills: Vec<String> = decode_list(Some(r#"["Rust", 42, null, "Go"]"#));
        assert_eq!(skills, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_optional_list_distinguishes_missing_from_empty() {
        assert_eq!(decode_optional_list::<String>(None), None);
        assert_eq!(decode_optional_list::<String>(Some("[]")), Some(vec![]));
        assert_eq!(decode_optional_list::<String>(Some("Rust, SQL")), None);
    }

    #[test]
    fn test_encode_list() {
        assert_eq!(encode_list(&["a".to_string()]), r#"["a"]"#);
    }
}
