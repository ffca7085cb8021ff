//! Configuration structures for rschema-core.
//!
//! Configuration is explicit and passed by the caller. The core crate does not
//! read environment variables or files; the CLI maps its flags onto these
//! structures.

use crate::draft::Draft;
use crate::errors::{RschemaError, RschemaResult};

/// Default maximum JSON bytes accepted by parsing helpers (2 MiB).
pub const DEFAULT_MAX_JSON_BYTES: usize = 2 * 1024 * 1024;

/// Default bound on nested `$ref` evaluation.
pub const DEFAULT_MAX_REF_DEPTH: usize = 256;

/// Validator configuration container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Draft assumed when a schema has no `$schema` keyword.
    pub default_draft: Draft,
    pub limits: LimitsConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            default_draft: Draft::Draft7,
            limits: LimitsConfig::default(),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Enforced by [`Validator::parse_instance`](crate::Validator::parse_instance).
    pub max_json_bytes: usize,
    pub max_ref_depth: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_json_bytes: DEFAULT_MAX_JSON_BYTES,
            max_ref_depth: DEFAULT_MAX_REF_DEPTH,
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &ValidatorConfig) -> RschemaResult<()> {
    if cfg.limits.max_json_bytes == 0 {
        return Err(RschemaError::invalid_argument(
            "max_json_bytes must be greater than zero",
        ));
    }

    if cfg.limits.max_ref_depth == 0 {
        return Err(RschemaError::invalid_argument(
            "max_ref_depth must be greater than zero",
        ));
    }

    Ok(())
}
