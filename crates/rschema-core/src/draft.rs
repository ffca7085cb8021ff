//! Draft helpers.
//!
//! Centralizes `$schema` URI parsing. It is intentionally strict: only the
//! drafts whose keyword semantics are implemented are accepted.

use serde_json::Value;

use crate::errors::{RschemaError, RschemaResult};

/// Known JSON Schema drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Draft {
    Draft6,
    Draft7,
}

impl Draft {
    /// Parse a `$schema` URI. The trailing empty fragment and the scheme are
    /// not significant.
    pub fn from_uri(uri: &str) -> RschemaResult<Self> {
        let trimmed = uri.trim_end_matches('#');
        let trimmed = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        match trimmed {
            "json-schema.org/draft-07/schema" => Ok(Self::Draft7),
            "json-schema.org/draft-06/schema" => Ok(Self::Draft6),
            _ => Err(RschemaError::unsupported_draft(uri)),
        }
    }

    /// Detect the draft declared by a schema document, if any.
    ///
    /// Returns `Ok(None)` for documents without `$schema` (including boolean
    /// schemas).
    pub fn detect(schema: &Value) -> RschemaResult<Option<Self>> {
        match schema.get("$schema") {
            None => Ok(None),
            Some(Value::String(uri)) => Self::from_uri(uri).map(Some),
            Some(_) => Err(RschemaError::invalid_schema(
                "/$schema",
                "expected a string",
            )),
        }
    }

    /// Canonical `$schema` URI.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Draft6 => "http://json-schema.org/draft-06/schema#",
            Self::Draft7 => "http://json-schema.org/draft-07/schema#",
        }
    }

    /// `if`/`then`/`else` arrived in draft-07.
    pub fn supports_conditionals(&self) -> bool {
        matches!(self, Self::Draft7)
    }

    /// So did `contentEncoding` and `contentMediaType`.
    pub fn supports_content(&self) -> bool {
        matches!(self, Self::Draft7)
    }
}
