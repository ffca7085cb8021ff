//! The public validator.
//!
//! A [`Validator`] is an immutable, compiled schema. Compile once, validate
//! many instances, from as many threads as needed: every validation method
//! takes `&self` and the type is `Send + Sync`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::trace;

use crate::compiler;
use crate::config::{validate_config, ValidatorConfig};
use crate::draft::Draft;
use crate::error::ValidationError;
use crate::errors::RschemaResult;
use crate::keywords::custom::KeywordFactory;
use crate::keywords::format::FormatCheck;
use crate::node::{SchemaNode, Scope};
use crate::output::BasicOutput;
use crate::parse::parse_json_bytes;
use crate::paths::Location;

/// Builder for [`Validator`].
///
/// Formats are asserted by default, as draft-06 and draft-07 validators
/// traditionally do. Unknown format names are ignored unless
/// [`should_ignore_unknown_formats`](Self::should_ignore_unknown_formats)
/// is turned off.
#[derive(Clone)]
pub struct ValidationOptions {
    draft: Option<Draft>,
    config: ValidatorConfig,
    pub(crate) keywords: BTreeMap<String, KeywordFactory>,
    pub(crate) formats: BTreeMap<String, FormatCheck>,
    pub(crate) validate_formats: bool,
    pub(crate) ignore_unknown_formats: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            draft: None,
            config: ValidatorConfig::default(),
            keywords: BTreeMap::new(),
            formats: BTreeMap::new(),
            validate_formats: true,
            ignore_unknown_formats: true,
        }
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("draft", &self.draft)
            .field("config", &self.config)
            .field("keywords", &self.keywords.keys().collect::<Vec<_>>())
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .field("validate_formats", &self.validate_formats)
            .field("ignore_unknown_formats", &self.ignore_unknown_formats)
            .finish()
    }
}

impl ValidationOptions {
    /// Force a draft, ignoring the schema's `$schema`.
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a custom keyword.
    pub fn with_keyword(mut self, name: impl Into<String>, factory: KeywordFactory) -> Self {
        self.keywords.insert(name.into(), factory);
        self
    }

    /// Register a format check. Takes precedence over a built-in format of
    /// the same name.
    pub fn with_format<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.insert(name.into(), Arc::new(check));
        self
    }

    /// Turn `format` assertions on or off.
    pub fn should_validate_formats(mut self, yes: bool) -> Self {
        self.validate_formats = yes;
        self
    }

    /// With `false`, an unknown format name is a schema error.
    pub fn should_ignore_unknown_formats(mut self, yes: bool) -> Self {
        self.ignore_unknown_formats = yes;
        self
    }

    /// Compile `schema`.
    pub fn build(&self, schema: &Value) -> RschemaResult<Validator> {
        validate_config(&self.config)?;

        let draft = match self.draft {
            Some(draft) => draft,
            None => Draft::detect(schema)?.unwrap_or(self.config.default_draft),
        };
        let compiled = compiler::compile(schema, draft, self)?;
        Ok(Validator {
            root: compiled.root,
            refs: compiled.refs,
            draft,
            config: self.config.clone(),
        })
    }
}

/// A compiled schema.
pub struct Validator {
    root: SchemaNode,
    refs: Vec<SchemaNode>,
    draft: Draft,
    config: ValidatorConfig,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("draft", &self.draft)
            .field("references", &self.refs.len())
            .finish()
    }
}

impl Validator {
    /// Compile `schema` with default options.
    pub fn new(schema: &Value) -> RschemaResult<Self> {
        Self::options().build(schema)
    }

    pub fn options() -> ValidationOptions {
        ValidationOptions::default()
    }

    pub fn draft(&self) -> Draft {
        self.draft
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    fn scope(&self) -> Scope<'_> {
        Scope::new(&self.refs, self.config.limits.max_ref_depth)
    }

    /// Fast check; stops at the first failure.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.root.is_valid(instance, self.scope())
    }

    /// Every error, in deterministic order.
    pub fn iter_errors(&self, instance: &Value) -> Vec<ValidationError> {
        let errors = self.root.errors(instance, &Location::new(), self.scope());
        trace!(errors = errors.len(), "validated instance");
        errors
    }

    pub fn validate(&self, instance: &Value) -> Result<(), Vec<ValidationError>> {
        let errors = self.iter_errors(instance);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Parse an instance, enforcing `limits.max_json_bytes`.
    pub fn parse_instance(&self, bytes: &[u8]) -> RschemaResult<Value> {
        parse_json_bytes(bytes, self.config.limits.max_json_bytes)
    }

    /// Validation result in the "basic" output format.
    pub fn apply(&self, instance: &Value) -> BasicOutput {
        BasicOutput::from_errors(&self.iter_errors(instance))
    }
}

/// Compile `schema` and check `instance` in one call.
pub fn is_valid(schema: &Value, instance: &Value) -> RschemaResult<bool> {
    Ok(Validator::new(schema)?.is_valid(instance))
}
