use regex::Regex;
use serde_json::Value;

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::errors::RschemaResult;
use crate::helpers::as_limit;
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

/// `minLength` / `maxLength`. Length counts Unicode scalar values, not bytes.
pub(crate) struct LengthValidator {
    limit: u64,
    min: bool,
    location: Location,
}

impl Validate for LengthValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::String(s) => {
                let len = s.chars().count() as u64;
                if self.min {
                    len >= self.limit
                } else {
                    len <= self.limit
                }
            }
            _ => true,
        }
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        if self.is_valid(instance, scope) {
            return;
        }
        let kind = if self.min {
            ValidationErrorKind::MinLength { limit: self.limit }
        } else {
            ValidationErrorKind::MaxLength { limit: self.limit }
        };
        errors.push(ValidationError::new(kind, instance, path, &self.location));
    }
}

pub(crate) fn compile_length(ctx: &Context<'_>, keyword: &str, value: &Value) -> CompilationResult {
    let limit =
        as_limit(value).ok_or_else(|| ctx.invalid(keyword, "expected a non-negative integer"))?;
    Ok(Box::new(LengthValidator {
        limit,
        min: keyword == "minLength",
        location: ctx.location().join(keyword),
    }))
}

pub(crate) struct PatternValidator {
    pattern: Regex,
    location: Location,
}

impl Validate for PatternValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::String(s) => self.pattern.is_match(s),
            _ => true,
        }
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        if !self.is_valid(instance, scope) {
            errors.push(ValidationError::new(
                ValidationErrorKind::Pattern {
                    pattern: self.pattern.as_str().to_string(),
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_regex(ctx: &Context<'_>, keyword: &str, pattern: &str) -> RschemaResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| ctx.invalid(keyword, format!("invalid regular expression: {e}")))
}

pub(crate) fn compile_pattern(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    let source = value
        .as_str()
        .ok_or_else(|| ctx.invalid("pattern", "expected a string"))?;
    Ok(Box::new(PatternValidator {
        pattern: compile_regex(ctx, "pattern", source)?,
        location: ctx.location().join("pattern"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::Validator;
    use serde_json::json;

    #[test]
    fn min_length_counts_characters() {
        let v = Validator::new(&json!({"minLength": 2})).unwrap();
        assert!(v.is_valid(&json!("ab")));
        assert!(v.is_valid(&json!("éé")));
        assert!(!v.is_valid(&json!("é")));
        assert!(v.is_valid(&json!(5)));
    }

    #[test]
    fn max_length() {
        let v = Validator::new(&json!({"maxLength": 1})).unwrap();
        assert!(v.is_valid(&json!("")));
        let errors = v.iter_errors(&json!("ab"));
        assert_eq!(errors[0].to_string(), "\"ab\" is longer than 1 character");
    }

    #[test]
    fn pattern_is_unanchored() {
        let v = Validator::new(&json!({"pattern": "^[a-z]+$"})).unwrap();
        assert!(v.is_valid(&json!("abc")));
        assert!(!v.is_valid(&json!("ab1")));

        let v = Validator::new(&json!({"pattern": "b"})).unwrap();
        assert!(v.is_valid(&json!("abc")));
    }

    #[test]
    fn bad_pattern_fails_compilation() {
        let err = Validator::new(&json!({"pattern": "("})).err().unwrap();
        assert!(err.to_string().contains("/pattern"));
    }
}
