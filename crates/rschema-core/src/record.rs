//! The Record schema and its violation report.
//!
//! A Record is an object with a positive integer `id`, a non-empty `name`,
//! optional unique non-empty `tags` and optional `metadata` whose values are
//! either a positive integer or a non-empty string. The schema document is
//! embedded verbatim and compiled once per process.
//!
//! Engine errors are mapped onto a small taxonomy ([`ViolationKind`]) so that
//! callers can react to "which field failed and why" without knowing JSON
//! Schema keywords.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::ValidatorConfig;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::errors::{RschemaError, RschemaResult};
use crate::helpers::is_integer;
use crate::paths::Location;
use crate::validator::Validator;

/// The Record schema document.
pub const RECORD_SCHEMA_JSON: &str = include_str!("../schemas/record.schema.json");

static RECORD_SCHEMA: OnceLock<Value> = OnceLock::new();
static RECORD_VALIDATOR: OnceLock<Validator> = OnceLock::new();

/// Parsed Record schema.
pub fn record_schema() -> RschemaResult<&'static Value> {
    if let Some(schema) = RECORD_SCHEMA.get() {
        return Ok(schema);
    }
    let parsed: Value = serde_json::from_str(RECORD_SCHEMA_JSON)
        .map_err(|e| RschemaError::invariant(format!("embedded record schema: {e}")))?;
    Ok(RECORD_SCHEMA.get_or_init(|| parsed))
}

/// Process-wide compiled Record validator.
///
/// Concurrent first calls may each compile the schema; one result wins and
/// every caller observes the same instance afterwards.
pub fn record_validator() -> RschemaResult<&'static Validator> {
    if let Some(validator) = RECORD_VALIDATOR.get() {
        return Ok(validator);
    }
    let compiled = compile_record_validator(ValidatorConfig::default())?;
    Ok(RECORD_VALIDATOR.get_or_init(|| compiled))
}

/// A Record validator with caller-supplied limits, for callers that parse
/// instances through [`Validator::parse_instance`].
pub fn compile_record_validator(config: ValidatorConfig) -> RschemaResult<Validator> {
    Validator::options()
        .with_config(config)
        .build(record_schema()?)
}

/// Category of a Record violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// `id` or `name` absent.
    MissingRequiredField,
    /// A field of the wrong JSON type.
    TypeMismatch,
    /// `id` or a metadata integer below 1.
    RangeViolation,
    /// `name`, a tag, a metadata key or a metadata string value is empty.
    EmptyStringViolation,
    DuplicateTagViolation,
    /// A metadata value matching both shapes or neither.
    AmbiguousMetadataValue,
    /// Any other keyword failure. Not produced by the Record schema itself.
    Other,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing-required-field",
            Self::TypeMismatch => "type-mismatch",
            Self::RangeViolation => "range-violation",
            Self::EmptyStringViolation => "empty-string-violation",
            Self::DuplicateTagViolation => "duplicate-tag-violation",
            Self::AmbiguousMetadataValue => "ambiguous-metadata-value",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (field, constraint) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Readable path, e.g. `id`, `tags[1]`, `metadata.k`.
    pub field: String,
    /// RFC 6901 pointer to the same location.
    pub pointer: String,
    pub kind: ViolationKind,
    /// Schema keyword that failed.
    pub keyword: String,
    pub message: String,
}

impl Violation {
    fn from_error(error: &ValidationError) -> Self {
        let (location, kind) = classify(error);
        Self {
            field: location.as_field_path(),
            pointer: location.as_pointer(),
            kind,
            keyword: error.kind.keyword().to_string(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.field, self.message, self.kind)
    }
}

/// Outcome of validating one candidate Record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl RecordReport {
    pub fn from_errors(errors: &[ValidationError]) -> Self {
        let violations: Vec<Violation> = errors.iter().map(Violation::from_error).collect();
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

/// Validate a candidate Record, reporting every violation.
pub fn validate_record(instance: &Value) -> RschemaResult<RecordReport> {
    let validator = record_validator()?;
    Ok(RecordReport::from_errors(&validator.iter_errors(instance)))
}

/// Where the violation is attributed, and its category.
fn classify(error: &ValidationError) -> (Location, ViolationKind) {
    let at = error.instance_path.clone();
    match &error.kind {
        ValidationErrorKind::Required { property } => (
            at.join(property.as_str()),
            ViolationKind::MissingRequiredField,
        ),
        ValidationErrorKind::Type { .. } => (at, ViolationKind::TypeMismatch),
        ValidationErrorKind::Minimum { .. } => (at, ViolationKind::RangeViolation),
        ValidationErrorKind::MinLength { .. } => (at, ViolationKind::EmptyStringViolation),
        ValidationErrorKind::UniqueItems => (at, ViolationKind::DuplicateTagViolation),
        ValidationErrorKind::PropertyNames { property, error } => {
            let (_, kind) = classify(error);
            (at.join(property.as_str()), kind)
        }
        ValidationErrorKind::OneOfNotValid { .. } => {
            let kind = match &error.instance {
                Value::String(_) => ViolationKind::EmptyStringViolation,
                Value::Number(n) if is_integer(n) => ViolationKind::RangeViolation,
                _ => ViolationKind::AmbiguousMetadataValue,
            };
            (at, kind)
        }
        ValidationErrorKind::OneOfMultipleValid { .. } => {
            (at, ViolationKind::AmbiguousMetadataValue)
        }
        _ => (at, ViolationKind::Other),
    }
}

/// A metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Integer(u64),
    Text(String),
}

/// A decoded, valid Record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, MetadataValue>>,
    /// Root fields outside the four known ones; the schema permits them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Record {
    /// Validate `value` and decode it.
    ///
    /// Invalid input yields [`RschemaError::InvalidRecord`]; use
    /// [`validate_record`] for the full report.
    pub fn from_value(value: &Value) -> RschemaResult<Self> {
        let report = validate_record(value)?;
        if let Some(first) = report.violations.first() {
            return Err(RschemaError::InvalidRecord {
                violations: report.violations.len(),
                first: first.to_string(),
            });
        }

        let obj = value
            .as_object()
            .ok_or_else(|| RschemaError::invariant("valid record is not an object"))?;

        let mut extra = BTreeMap::new();
        for (key, v) in obj {
            if !matches!(key.as_str(), "id" | "name" | "tags" | "metadata") {
                extra.insert(key.clone(), v.clone());
            }
        }

        Ok(Self {
            id: positive_integer(obj.get("id"), "id")?,
            name: text(obj.get("name"), "name")?,
            tags: obj.get("tags").map(decode_tags).transpose()?,
            metadata: obj
                .get("metadata")
                .and_then(Value::as_object)
                .map(decode_metadata)
                .transpose()?,
            extra,
        })
    }

    pub fn to_value(&self) -> RschemaResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Integral JSON number as `u64`. `3.0` decodes as `3`.
fn positive_integer(v: Option<&Value>, field: &str) -> RschemaResult<u64> {
    let v = v.ok_or_else(|| RschemaError::invariant(format!("{field} missing")))?;
    if let Some(n) = v.as_u64() {
        return Ok(n);
    }
    match v.as_f64() {
        Some(f) if f >= 1.0 && f.fract() == 0.0 && f < u64::MAX as f64 => {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Ok(f as u64)
        }
        _ => Err(RschemaError::serialization(format!(
            "{field}: {v} does not fit an unsigned 64-bit integer"
        ))),
    }
}

fn text(v: Option<&Value>, field: &str) -> RschemaResult<String> {
    v.and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RschemaError::invariant(format!("{field} is not a string")))
}

fn decode_tags(v: &Value) -> RschemaResult<Vec<String>> {
    let items = v
        .as_array()
        .ok_or_else(|| RschemaError::invariant("tags is not an array"))?;
    items.iter().map(|t| text(Some(t), "tags")).collect()
}

fn decode_metadata(map: &Map<String, Value>) -> RschemaResult<BTreeMap<String, MetadataValue>> {
    let mut out = BTreeMap::new();
    for (key, v) in map {
        let decoded = if v.is_string() {
            MetadataValue::Text(text(Some(v), key)?)
        } else {
            MetadataValue::Integer(positive_integer(Some(v), key)?)
        };
        out.insert(key.clone(), decoded);
    }
    Ok(out)
}
