use serde_json::Value;

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

/// `$ref` to a slot of the reference table.
///
/// Errors raised inside the target keep the target's own schema location
/// (e.g. `/definitions/positiveInteger/minimum`).
pub(crate) struct RefValidator {
    slot: usize,
    location: Location,
}

impl Validate for RefValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match scope.enter(self.slot) {
            Some((node, inner)) => node.is_valid(instance, inner),
            None => false,
        }
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        match scope.enter(self.slot) {
            Some((node, inner)) => node.validate(instance, path, inner, errors),
            None => errors.push(ValidationError::new(
                ValidationErrorKind::RecursionLimit {
                    limit: scope.max_depth(),
                },
                instance,
                path,
                &self.location,
            )),
        }
    }
}

pub(crate) fn compile(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    let reference = value
        .as_str()
        .ok_or_else(|| ctx.invalid("$ref", "expected a string"))?;
    Ok(Box::new(RefValidator {
        slot: ctx.reference_slot(reference)?,
        location: ctx.location().join("$ref"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::config::ValidatorConfig;
    use crate::error::ValidationErrorKind;
    use crate::Validator;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn definitions_are_resolved() {
        let v = Validator::new(&json!({
            "definitions": {"pos": {"type": "integer", "minimum": 1}},
            "properties": {"id": {"$ref": "#/definitions/pos"}}
        }))
        .unwrap();
        assert!(v.is_valid(&json!({"id": 1})));
        let errors = v.iter_errors(&json!({"id": 0}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].instance_path.as_pointer(), "/id");
        assert_eq!(errors[0].schema_path.as_pointer(), "/definitions/pos/minimum");
    }

    #[test]
    fn siblings_of_ref_are_ignored() {
        let v = Validator::new(&json!({
            "definitions": {"any": {}},
            "properties": {"a": {"$ref": "#/definitions/any", "type": "string"}}
        }))
        .unwrap();
        assert!(v.is_valid(&json!({"a": 1})));
    }

    #[test]
    fn recursive_tree() {
        let v = Validator::new(&json!({
            "type": "object",
            "properties": {
                "value": {"type": "integer"},
                "children": {"type": "array", "items": {"$ref": "#"}}
            }
        }))
        .unwrap();
        let tree = json!({"value": 1, "children": [{"value": 2, "children": [{"value": "x"}]}]});
        let errors = v.iter_errors(&tree);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].instance_path.as_pointer(), "/children/0/children/0/value");
    }

    #[test]
    fn self_reference_hits_the_depth_limit() {
        let mut config = ValidatorConfig::default();
        config.limits.max_ref_depth = 8;
        let v = Validator::options()
            .with_config(config)
            .build(&json!({"$ref": "#"}))
            .unwrap();
        assert!(!v.is_valid(&json!(1)));
        let errors = v.iter_errors(&json!(1));
        assert_matches!(errors[0].kind, ValidationErrorKind::RecursionLimit { limit: 8 });
    }
}
