//! Parsing helpers for schemas and instances.
//!
//! The core crate does no filesystem or network I/O. These helpers operate on
//! in-memory bytes and enforce an explicit size limit supplied by the caller.

use serde_json::Value;

use crate::draft::Draft;
use crate::errors::{RschemaError, RschemaResult};

pub use crate::config::DEFAULT_MAX_JSON_BYTES;

/// Parse JSON bytes into a `Value` with a hard size limit.
pub fn parse_json_bytes(bytes: &[u8], max_bytes: usize) -> RschemaResult<Value> {
    if bytes.len() > max_bytes {
        return Err(RschemaError::invalid_argument(format!(
            "JSON payload too large ({} bytes > limit {})",
            bytes.len(),
            max_bytes
        )));
    }

    serde_json::from_slice(bytes)
        .map_err(|e| RschemaError::serialization(format!("failed to parse JSON: {e}")))
}

pub fn parse_json_str(s: &str, max_bytes: usize) -> RschemaResult<Value> {
    parse_json_bytes(s.as_bytes(), max_bytes)
}

/// Draft declared by a parsed schema document, if any.
pub fn detect_draft(schema: &Value) -> RschemaResult<Option<Draft>> {
    Draft::detect(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_json_bytes_respects_limit() {
        let bytes = br#"{"id":1}"#;
        let v = parse_json_bytes(bytes, 1024).unwrap();
        assert_eq!(v["id"], 1);

        let err = parse_json_bytes(bytes, 1).err().unwrap();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn parse_errors_are_serialization_errors() {
        let err = parse_json_str("{\"id\":", DEFAULT_MAX_JSON_BYTES).err().unwrap();
        assert_eq!(err.code(), "serialization");
    }

    #[test]
    fn detect_draft_from_text() {
        let v = parse_json_str(
            r#"{"$schema":"http://json-schema.org/draft-07/schema#"}"#,
            DEFAULT_MAX_JSON_BYTES,
        )
        .unwrap();
        assert_eq!(detect_draft(&v).unwrap(), Some(Draft::Draft7));
    }
}
