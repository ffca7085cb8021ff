//! User-defined keywords.
//!
//! A custom keyword is registered by name with a [`KeywordFactory`]. When a
//! schema object contains that keyword, the factory receives the keyword value
//! and the surrounding schema object and returns a [`Keyword`] that checks
//! instances. Custom keywords take precedence over built-ins of the same name.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

/// Instance check for a custom keyword.
pub trait Keyword: Send + Sync {
    /// `Err(message)` when `instance` violates the keyword.
    fn check(&self, instance: &Value) -> Result<(), String>;

    fn is_valid(&self, instance: &Value) -> bool {
        self.check(instance).is_ok()
    }
}

/// Builds a [`Keyword`] from `(keyword value, parent schema object)`.
pub type KeywordFactory =
    Arc<dyn Fn(&Value, &Map<String, Value>) -> anyhow::Result<Box<dyn Keyword>> + Send + Sync>;

pub(crate) struct CustomKeywordValidator {
    keyword: String,
    inner: Box<dyn Keyword>,
    location: Location,
}

impl Validate for CustomKeywordValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        self.inner.is_valid(instance)
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        _: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Err(message) = self.inner.check(instance) {
            errors.push(ValidationError::new(
                ValidationErrorKind::Custom {
                    keyword: self.keyword.clone(),
                    message,
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile(
    ctx: &Context<'_>,
    keyword: &str,
    factory: &KeywordFactory,
    parent: &Map<String, Value>,
    value: &Value,
) -> CompilationResult {
    let inner = factory(value, parent).map_err(|e| ctx.invalid(keyword, format!("{e:#}")))?;
    Ok(Box::new(CustomKeywordValidator {
        keyword: keyword.to_string(),
        inner,
        location: ctx.location().join(keyword),
    }))
}
