//! "Basic" output format: a flat list of output units.

use serde::Serialize;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputUnit {
    pub keyword_location: String,
    pub instance_location: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicOutput {
    pub valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OutputUnit>,
}

impl BasicOutput {
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        Self {
            valid: errors.is_empty(),
            errors: errors
                .iter()
                .map(|e| OutputUnit {
                    keyword_location: e.schema_path.as_pointer(),
                    instance_location: e.instance_path.as_pointer(),
                    error: e.to_string(),
                })
                .collect(),
        }
    }
}
