//! Library errors for rschema-core.
//!
//! These are errors about *schemas and inputs*, not about instances: a schema
//! that cannot be compiled, a payload that cannot be parsed, a configuration
//! that is out of range. Instance-level failures are reported as
//! [`crate::error::ValidationError`] values and never surface through this type.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type RschemaResult<T> = Result<T, RschemaError>;

#[derive(Debug, Error)]
pub enum RschemaError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The schema document is malformed at `pointer`.
    #[error("invalid schema at '{pointer}': {message}")]
    InvalidSchema { pointer: String, message: String },

    /// A Record failed validation; the full report comes from
    /// [`crate::record::validate_record`].
    #[error("invalid record: {violations} violation(s), first: {first}")]
    InvalidRecord { violations: usize, first: String },

    #[error("unsupported draft: {0}")]
    UnsupportedDraft(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl RschemaError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn invalid_schema(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_draft(uri: impl Into<String>) -> Self {
        Self::UnsupportedDraft(uri.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    /// Stable short code, suitable for machine-readable CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Serialization(_) => "serialization",
            Self::InvalidSchema { .. } => "invalid_schema",
            Self::InvalidRecord { .. } => "invalid_record",
            Self::UnsupportedDraft(_) => "unsupported_draft",
            Self::Invariant(_) => "invariant",
        }
    }
}

impl From<serde_json::Error> for RschemaError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_schema_display_includes_pointer() {
        let e = RschemaError::invalid_schema("/properties/id/minimum", "expected a number");
        let s = e.to_string();
        assert!(s.contains("/properties/id/minimum"));
        assert!(s.contains("expected a number"));
        assert_eq!(e.code(), "invalid_schema");
    }

    #[test]
    fn serde_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: RschemaError = err.into();
        assert_eq!(e.code(), "serialization");
    }
}
