//! `minimum`, `maximum`, `exclusiveMinimum`, `exclusiveMaximum`, `multipleOf`.
//!
//! Draft-06 and later use the numeric form of the exclusive bounds. Integer
//! comparisons are exact; only mixed integer/float comparisons go through f64.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::helpers::compare_numbers;
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
}

impl Bound {
    fn accepts(&self, ord: Ordering) -> bool {
        match self {
            Self::Minimum => ord != Ordering::Less,
            Self::Maximum => ord != Ordering::Greater,
            Self::ExclusiveMinimum => ord == Ordering::Greater,
            Self::ExclusiveMaximum => ord == Ordering::Less,
        }
    }

    fn error_kind(&self, limit: &Number) -> ValidationErrorKind {
        let limit = Value::Number(limit.clone());
        match self {
            Self::Minimum => ValidationErrorKind::Minimum { limit },
            Self::Maximum => ValidationErrorKind::Maximum { limit },
            Self::ExclusiveMinimum => ValidationErrorKind::ExclusiveMinimum { limit },
            Self::ExclusiveMaximum => ValidationErrorKind::ExclusiveMaximum { limit },
        }
    }
}

pub(crate) struct BoundValidator {
    bound: Bound,
    limit: Number,
    location: Location,
}

impl Validate for BoundValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::Number(n) => compare_numbers(n, &self.limit)
                .map_or(false, |ord| self.bound.accepts(ord)),
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
                self.bound.error_kind(&self.limit),
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_bound(ctx: &Context<'_>, keyword: &str, value: &Value) -> CompilationResult {
    let bound = match keyword {
        "minimum" => Bound::Minimum,
        "maximum" => Bound::Maximum,
        "exclusiveMinimum" => Bound::ExclusiveMinimum,
        _ => Bound::ExclusiveMaximum,
    };
    let limit = match value {
        Value::Number(n) => n.clone(),
        _ => return Err(ctx.invalid(keyword, "expected a number")),
    };
    Ok(Box::new(BoundValidator {
        bound,
        limit,
        location: ctx.location().join(keyword),
    }))
}

pub(crate) struct MultipleOfValidator {
    multiple_of: f64,
    location: Location,
}

impl MultipleOfValidator {
    fn check(&self, n: &Number) -> bool {
        if let (Some(value), Some(divisor)) = (n.as_i64(), self.integer_divisor()) {
            return value % divisor == 0;
        }
        let Some(value) = n.as_f64() else {
            return false;
        };
        let quotient = value / self.multiple_of;
        if !quotient.is_finite() {
            return false;
        }
        (quotient - quotient.round()).abs() < 1e-9
    }

    fn integer_divisor(&self) -> Option<i64> {
        if self.multiple_of.fract() == 0.0 && self.multiple_of.abs() < i64::MAX as f64 {
            #[allow(clippy::cast_possible_truncation)]
            Some(self.multiple_of as i64)
        } else {
            None
        }
    }
}

impl Validate for MultipleOfValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::Number(n) => self.check(n),
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
                ValidationErrorKind::MultipleOf {
                    multiple_of: self.multiple_of,
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_multiple_of(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    let multiple_of = value
        .as_f64()
        .filter(|m| *m > 0.0)
        .ok_or_else(|| ctx.invalid("multipleOf", "expected a number greater than zero"))?;
    Ok(Box::new(MultipleOfValidator {
        multiple_of,
        location: ctx.location().join("multipleOf"),
    }))
}
