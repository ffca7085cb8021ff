use serde_json::Value;

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::helpers::equal;
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

pub(crate) struct EnumValidator {
    options: Value,
    location: Location,
}

impl Validate for EnumValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        self.options
            .as_array()
            .map_or(false, |items| items.iter().any(|o| equal(o, instance)))
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
                ValidationErrorKind::Enum {
                    options: self.options.clone(),
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_enum(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    if !value.is_array() {
        return Err(ctx.invalid("enum", "expected an array"));
    }
    Ok(Box::new(EnumValidator {
        options: value.clone(),
        location: ctx.location().join("enum"),
    }))
}

pub(crate) struct ConstValidator {
    expected: Value,
    location: Location,
}

impl Validate for ConstValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        equal(&self.expected, instance)
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
                ValidationErrorKind::Constant {
                    expected: self.expected.clone(),
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_const(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(ConstValidator {
        expected: value.clone(),
        location: ctx.location().join("const"),
    }))
}
