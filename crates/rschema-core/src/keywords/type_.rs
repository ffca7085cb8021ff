use serde_json::Value;

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::helpers::is_integer;
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "array" => Self::Array,
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "null" => Self::Null,
            "number" => Self::Number,
            "object" => Self::Object,
            "string" => Self::String,
            _ => return None,
        })
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Null => "null",
            Self::Number => "number",
            Self::Object => "object",
            Self::String => "string",
        }
    }

    fn matches(&self, instance: &Value) -> bool {
        match (self, instance) {
            (Self::Array, Value::Array(_)) => true,
            (Self::Boolean, Value::Bool(_)) => true,
            (Self::Integer, Value::Number(n)) => is_integer(n),
            (Self::Null, Value::Null) => true,
            (Self::Number, Value::Number(_)) => true,
            (Self::Object, Value::Object(_)) => true,
            (Self::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

pub(crate) struct TypeValidator {
    types: Vec<PrimitiveType>,
    location: Location,
}

impl Validate for TypeValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        self.types.iter().any(|t| t.matches(instance))
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
                ValidationErrorKind::Type {
                    expected: self.types.iter().map(|t| t.as_str().to_string()).collect(),
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    let parse = |v: &Value| {
        v.as_str()
            .and_then(PrimitiveType::parse)
            .ok_or_else(|| ctx.invalid("type", format!("unknown type {v}")))
    };
    let types = match value {
        Value::String(_) => vec![parse(value)?],
        Value::Array(items) if !items.is_empty() => {
            items.iter().map(parse).collect::<Result<Vec<_>, _>>()?
        }
        _ => {
            return Err(ctx.invalid(
                "type",
                "expected a type name or a non-empty array of type names",
            ))
        }
    };
    Ok(Box::new(TypeValidator {
        types,
        location: ctx.location().join("type"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::Validator;
    use serde_json::json;

    #[test]
    fn integer_accepts_integral_floats() {
        let v = Validator::new(&json!({"type": "integer"})).unwrap();
        assert!(v.is_valid(&json!(1)));
        assert!(v.is_valid(&json!(1.0)));
        assert!(!v.is_valid(&json!(1.5)));
        assert!(!v.is_valid(&json!("1")));
    }

    #[test]
    fn type_lists() {
        let v = Validator::new(&json!({"type": ["string", "null"]})).unwrap();
        assert!(v.is_valid(&json!(null)));
        assert!(v.is_valid(&json!("x")));
        let errors = v.iter_errors(&json!(3));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].schema_path.as_pointer(), "/type");
    }

    #[test]
    fn unknown_type_fails_compilation() {
        assert!(Validator::new(&json!({"type": "float"})).is_err());
        assert!(Validator::new(&json!({"type": []})).is_err());
    }
}
