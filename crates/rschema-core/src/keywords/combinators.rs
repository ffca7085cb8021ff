//! Applicators combining subschemas: `allOf`, `anyOf`, `oneOf`, `not`,
//! `if`/`then`/`else`.

use serde_json::{Map, Value};

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::keywords::{compile_schema_array, CompilationResult, Validate};
use crate::node::{SchemaNode, Scope};
use crate::paths::Location;

/// `allOf` reports the errors of every failing subschema directly.
pub(crate) struct AllOfValidator {
    nodes: Vec<SchemaNode>,
}

impl Validate for AllOfValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        self.nodes.iter().all(|n| n.is_valid(instance, scope))
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        for node in &self.nodes {
            node.validate(instance, path, scope, errors);
        }
    }
}

pub(crate) fn compile_all_of(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(AllOfValidator {
        nodes: compile_schema_array(ctx, "allOf", value)?,
    }))
}

pub(crate) struct AnyOfValidator {
    nodes: Vec<SchemaNode>,
    location: Location,
}

impl Validate for AnyOfValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        self.nodes.iter().any(|n| n.is_valid(instance, scope))
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
                ValidationErrorKind::AnyOf,
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_any_of(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(AnyOfValidator {
        nodes: compile_schema_array(ctx, "anyOf", value)?,
        location: ctx.location().join("anyOf"),
    }))
}

/// `oneOf`: exactly one alternative must match.
pub(crate) struct OneOfValidator {
    nodes: Vec<SchemaNode>,
    location: Location,
}

impl Validate for OneOfValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        let mut matched = 0usize;
        for node in &self.nodes {
            if node.is_valid(instance, scope) {
                matched += 1;
                if matched > 1 {
                    return false;
                }
            }
        }
        matched == 1
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        let results: Vec<Vec<ValidationError>> = self
            .nodes
            .iter()
            .map(|node| node.errors(instance, path, scope))
            .collect();
        let matched: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, errs)| errs.is_empty())
            .map(|(idx, _)| idx)
            .collect();

        let kind = match matched.len() {
            1 => return,
            0 => ValidationErrorKind::OneOfNotValid { context: results },
            _ => ValidationErrorKind::OneOfMultipleValid { matched },
        };
        errors.push(ValidationError::new(kind, instance, path, &self.location));
    }
}

pub(crate) fn compile_one_of(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(OneOfValidator {
        nodes: compile_schema_array(ctx, "oneOf", value)?,
        location: ctx.location().join("oneOf"),
    }))
}

pub(crate) struct NotValidator {
    node: SchemaNode,
    schema: Value,
    location: Location,
}

impl Validate for NotValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        !self.node.is_valid(instance, scope)
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
                ValidationErrorKind::Not {
                    schema: self.schema.clone(),
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_not(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(NotValidator {
        node: ctx.at("not").compile(value)?,
        schema: value.clone(),
        location: ctx.location().join("not"),
    }))
}

/// `if` with optional `then` / `else` from the same schema object. Failures
/// of the chosen branch are reported as-is.
pub(crate) struct IfValidator {
    condition: SchemaNode,
    then_branch: Option<SchemaNode>,
    else_branch: Option<SchemaNode>,
}

impl IfValidator {
    fn branch(&self, instance: &Value, scope: Scope<'_>) -> Option<&SchemaNode> {
        if self.condition.is_valid(instance, scope) {
            self.then_branch.as_ref()
        } else {
            self.else_branch.as_ref()
        }
    }
}

impl Validate for IfValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        self.branch(instance, scope)
            .map_or(true, |node| node.is_valid(instance, scope))
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(node) = self.branch(instance, scope) {
            node.validate(instance, path, scope, errors);
        }
    }
}

pub(crate) fn compile_if(
    ctx: &Context<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> CompilationResult {
    let branch = |keyword: &str| {
        parent
            .get(keyword)
            .map(|schema| ctx.at(keyword).compile(schema))
            .transpose()
    };
    Ok(Box::new(IfValidator {
        condition: ctx.at("if").compile(value)?,
        then_branch: branch("then")?,
        else_branch: branch("else")?,
    }))
}

#[cfg(test)]
mod tests {
    use crate::draft::Draft;
    use crate::error::ValidationErrorKind;
    use crate::Validator;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn all_of_reports_every_branch() {
        let v = Validator::new(&json!({"allOf": [{"type": "integer"}, {"minimum": 10}]})).unwrap();
        assert!(v.is_valid(&json!(10)));
        assert_eq!(v.iter_errors(&json!(2.5)).len(), 2);
    }

    #[test]
    fn any_of() {
        let v = Validator::new(&json!({"anyOf": [{"type": "string"}, {"minimum": 2}]})).unwrap();
        assert!(v.is_valid(&json!("a")));
        assert!(v.is_valid(&json!(3)));
        let errors = v.iter_errors(&json!(1));
        assert_matches!(errors[0].kind, ValidationErrorKind::AnyOf);
    }

    #[test]
    fn one_of_none_carries_context() {
        let v = Validator::new(&json!({
            "oneOf": [{"type": "integer", "minimum": 1}, {"type": "string", "minLength": 1}]
        }))
        .unwrap();
        let errors = v.iter_errors(&json!(3.5));
        assert_eq!(errors.len(), 1);
        assert_matches!(
            &errors[0].kind,
            ValidationErrorKind::OneOfNotValid { context } if context.len() == 2
        );
        assert_eq!(errors[0].schema_path.as_pointer(), "/oneOf");
    }

    #[test]
    fn one_of_multiple_matches() {
        let v = Validator::new(&json!({"oneOf": [{"type": "integer"}, {"minimum": 0}]})).unwrap();
        assert!(v.is_valid(&json!(-1)));
        assert!(!v.is_valid(&json!(1)));
        let errors = v.iter_errors(&json!(1));
        assert_matches!(
            &errors[0].kind,
            ValidationErrorKind::OneOfMultipleValid { matched } if matched == &vec![0, 1]
        );
    }

    #[test]
    fn not_keyword() {
        let v = Validator::new(&json!({"not": {"type": "null"}})).unwrap();
        assert!(v.is_valid(&json!(0)));
        let errors = v.iter_errors(&json!(null));
        assert_eq!(errors[0].to_string(), "{\"type\":\"null\"} is not allowed for null");
    }

    #[test]
    fn conditionals() {
        let schema = json!({
            "if": {"properties": {"kind": {"const": "int"}}},
            "then": {"properties": {"value": {"type": "integer"}}},
            "else": {"properties": {"value": {"type": "string"}}}
        });
        let v = Validator::new(&schema).unwrap();
        assert!(v.is_valid(&json!({"kind": "int", "value": 1})));
        assert!(!v.is_valid(&json!({"kind": "int", "value": "1"})));
        assert!(v.is_valid(&json!({"kind": "str", "value": "1"})));
        assert!(!v.is_valid(&json!({"kind": "str", "value": 1})));
    }

    #[test]
    fn conditionals_ignored_in_draft6() {
        let schema = json!({
            "if": {"type": "integer"},
            "then": {"minimum": 10}
        });
        let v = Validator::options()
            .with_draft(Draft::Draft6)
            .build(&schema)
            .unwrap();
        assert!(v.is_valid(&json!(1)));
    }

    #[test]
    fn empty_combinator_arrays_are_rejected() {
        assert!(Validator::new(&json!({"oneOf": []})).is_err());
        assert!(Validator::new(&json!({"anyOf": {}})).is_err());
    }
}
