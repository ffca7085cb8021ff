//! Instance validation errors.
//!
//! A [`ValidationError`] describes one failed keyword for one location in the
//! validated instance. Messages are stable for identical inputs so they can be
//! compared in tests and CI logs.

use std::fmt;

use serde_json::Value;

use crate::paths::Location;

/// What went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    /// The schema is `false`.
    FalseSchema,
    Type { expected: Vec<String> },
    Enum { options: Value },
    Constant { expected: Value },
    Minimum { limit: Value },
    Maximum { limit: Value },
    ExclusiveMinimum { limit: Value },
    ExclusiveMaximum { limit: Value },
    MultipleOf { multiple_of: f64 },
    MinLength { limit: u64 },
    MaxLength { limit: u64 },
    Pattern { pattern: String },
    /// A string rejected by a `format` check.
    Format { format: String },
    /// A string that does not decode under `contentEncoding`.
    ContentEncoding { encoding: String },
    /// (Decoded) content that does not parse as `contentMediaType`.
    ContentMediaType { media_type: String },
    MinItems { limit: u64 },
    MaxItems { limit: u64 },
    UniqueItems,
    Contains,
    /// Items beyond the tuple form of `items` are forbidden.
    AdditionalItems { limit: usize },
    /// Also produced by the array form of `dependencies`.
    Required { property: String },
    AdditionalProperties { unexpected: Vec<String> },
    /// A property name failed the `propertyNames` schema.
    PropertyNames {
        property: String,
        error: Box<ValidationError>,
    },
    MinProperties { limit: u64 },
    MaxProperties { limit: u64 },
    AnyOf,
    /// No `oneOf` alternative matched; `context` holds the errors of every
    /// alternative, in order.
    OneOfNotValid { context: Vec<Vec<ValidationError>> },
    /// More than one `oneOf` alternative matched.
    OneOfMultipleValid { matched: Vec<usize> },
    Not { schema: Value },
    /// A failure reported by a custom keyword.
    Custom { keyword: String, message: String },
    /// `$ref` evaluation nested deeper than the configured limit.
    RecursionLimit { limit: usize },
}

impl ValidationErrorKind {
    /// The schema keyword this error originates from.
    pub fn keyword(&self) -> &str {
        match self {
            Self::FalseSchema => "false",
            Self::Type { .. } => "type",
            Self::Enum { .. } => "enum",
            Self::Constant { .. } => "const",
            Self::Minimum { .. } => "minimum",
            Self::Maximum { .. } => "maximum",
            Self::ExclusiveMinimum { .. } => "exclusiveMinimum",
            Self::ExclusiveMaximum { .. } => "exclusiveMaximum",
            Self::MultipleOf { .. } => "multipleOf",
            Self::MinLength { .. } => "minLength",
            Self::MaxLength { .. } => "maxLength",
            Self::Pattern { .. } => "pattern",
            Self::Format { .. } => "format",
            Self::ContentEncoding { .. } => "contentEncoding",
            Self::ContentMediaType { .. } => "contentMediaType",
            Self::MinItems { .. } => "minItems",
            Self::MaxItems { .. } => "maxItems",
            Self::UniqueItems => "uniqueItems",
            Self::Contains => "contains",
            Self::AdditionalItems { .. } => "additionalItems",
            Self::Required { .. } => "required",
            Self::AdditionalProperties { .. } => "additionalProperties",
            Self::PropertyNames { .. } => "propertyNames",
            Self::MinProperties { .. } => "minProperties",
            Self::MaxProperties { .. } => "maxProperties",
            Self::AnyOf => "anyOf",
            Self::OneOfNotValid { .. } | Self::OneOfMultipleValid { .. } => "oneOf",
            Self::Not { .. } => "not",
            Self::Custom { keyword, .. } => keyword,
            Self::RecursionLimit { .. } => "$ref",
        }
    }
}

/// One failed keyword at one instance location.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The offending value (owned so errors outlive the instance).
    pub instance: Value,
    pub kind: ValidationErrorKind,
    /// Where in the instance the failure happened.
    pub instance_path: Location,
    /// Which keyword in the schema failed.
    pub schema_path: Location,
}

impl ValidationError {
    pub fn new(
        kind: ValidationErrorKind,
        instance: &Value,
        instance_path: &Location,
        schema_path: &Location,
    ) -> Self {
        Self {
            instance: instance.clone(),
            kind,
            instance_path: instance_path.clone(),
            schema_path: schema_path.clone(),
        }
    }
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let instance = &self.instance;
        match &self.kind {
            ValidationErrorKind::FalseSchema => {
                write!(f, "False schema does not allow {instance}")
            }
            ValidationErrorKind::Type { expected } if expected.len() == 1 => {
                write!(f, "{instance} is not of type \"{}\"", expected[0])
            }
            ValidationErrorKind::Type { expected } => {
                write!(f, "{instance} is not of types {}", quoted_list(expected))
            }
            ValidationErrorKind::Enum { options } => {
                write!(f, "{instance} is not one of {options}")
            }
            ValidationErrorKind::Constant { expected } => write!(f, "{expected} was expected"),
            ValidationErrorKind::Minimum { limit } => {
                write!(f, "{instance} is less than the minimum of {limit}")
            }
            ValidationErrorKind::Maximum { limit } => {
                write!(f, "{instance} is greater than the maximum of {limit}")
            }
            ValidationErrorKind::ExclusiveMinimum { limit } => {
                write!(f, "{instance} is less than or equal to the minimum of {limit}")
            }
            ValidationErrorKind::ExclusiveMaximum { limit } => {
                write!(f, "{instance} is greater than or equal to the maximum of {limit}")
            }
            ValidationErrorKind::MultipleOf { multiple_of } => {
                write!(f, "{instance} is not a multiple of {multiple_of}")
            }
            ValidationErrorKind::MinLength { limit } => write!(
                f,
                "{instance} is shorter than {limit} character{}",
                plural(*limit)
            ),
            ValidationErrorKind::MaxLength { limit } => write!(
                f,
                "{instance} is longer than {limit} character{}",
                plural(*limit)
            ),
            ValidationErrorKind::Pattern { pattern } => {
                write!(f, "{instance} does not match \"{pattern}\"")
            }
            ValidationErrorKind::Format { format } => {
                write!(f, "{instance} is not a \"{format}\"")
            }
            ValidationErrorKind::ContentEncoding { encoding } => write!(
                f,
                "{instance} is not compliant with \"{encoding}\" content encoding"
            ),
            ValidationErrorKind::ContentMediaType { media_type } => {
                write!(f, "{instance} is not compliant with \"{media_type}\"")
            }
            ValidationErrorKind::MinItems { limit } => {
                write!(f, "{instance} has less than {limit} item{}", plural(*limit))
            }
            ValidationErrorKind::MaxItems { limit } => {
                write!(f, "{instance} has more than {limit} item{}", plural(*limit))
            }
            ValidationErrorKind::UniqueItems => write!(f, "{instance} has non-unique elements"),
            ValidationErrorKind::Contains => {
                write!(f, "None of {instance} are valid under the given schema")
            }
            ValidationErrorKind::AdditionalItems { limit } => write!(
                f,
                "Additional items are not allowed ({instance} has more than {limit} item{})",
                plural(*limit as u64)
            ),
            ValidationErrorKind::Required { property } => {
                write!(f, "\"{property}\" is a required property")
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let verb = if unexpected.len() == 1 { "was" } else { "were" };
                write!(
                    f,
                    "Additional properties are not allowed ({} {verb} unexpected)",
                    quoted_list(unexpected)
                )
            }
            ValidationErrorKind::PropertyNames { error, .. } => fmt::Display::fmt(error, f),
            ValidationErrorKind::MinProperties { limit } => write!(
                f,
                "{instance} has less than {limit} propert{}",
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::MaxProperties { limit } => write!(
                f,
                "{instance} has more than {limit} propert{}",
                if *limit == 1 { "y" } else { "ies" }
            ),
            ValidationErrorKind::AnyOf => write!(
                f,
                "{instance} is not valid under any of the schemas listed in the 'anyOf' keyword"
            ),
            ValidationErrorKind::OneOfNotValid { .. } => write!(
                f,
                "{instance} is not valid under any of the schemas listed in the 'oneOf' keyword"
            ),
            ValidationErrorKind::OneOfMultipleValid { .. } => write!(
                f,
                "{instance} is valid under more than one of the schemas listed in the 'oneOf' keyword"
            ),
            ValidationErrorKind::Not { schema } => {
                write!(f, "{schema} is not allowed for {instance}")
            }
            ValidationErrorKind::Custom { message, .. } => f.write_str(message),
            ValidationErrorKind::RecursionLimit { limit } => {
                write!(f, "reference nesting exceeds the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
