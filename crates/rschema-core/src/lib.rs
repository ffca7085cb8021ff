//! rschema-core
//!
//! Core of rschema:
//! - The Record schema document and its violation taxonomy
//! - A JSON Schema (draft-06 / draft-07) compiler and validator
//! - Size-limited JSON parsing helpers
//!
//! The crate performs no I/O and reads no environment. A compiled
//! [`Validator`] is immutable and may be shared freely across threads.

mod compiler;
mod helpers;
mod keywords;
mod node;

pub mod config;
pub mod draft;
pub mod error;
pub mod errors;
pub mod output;
pub mod parse;
pub mod paths;
pub mod record;
pub mod validator;

pub use crate::errors::{RschemaError, RschemaResult};
pub use crate::keywords::custom::{Keyword, KeywordFactory};
pub use crate::keywords::format::FormatCheck;
pub use crate::validator::{is_valid, ValidationOptions, Validator};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::{LimitsConfig, ValidatorConfig};
    pub use crate::draft::Draft;
    pub use crate::error::{ValidationError, ValidationErrorKind};
    pub use crate::output::{BasicOutput, OutputUnit};
    pub use crate::paths::{Location, LocationSegment};
    pub use crate::record::{
        compile_record_validator, record_validator, validate_record, MetadataValue, Record,
        RecordReport, Violation, ViolationKind,
    };
    pub use crate::{FormatCheck, Keyword, KeywordFactory, RschemaError, RschemaResult, Validator};
}
