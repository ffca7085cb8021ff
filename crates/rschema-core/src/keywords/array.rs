//! Array keywords: `items`, `additionalItems`, `minItems`, `maxItems`,
//! `uniqueItems`, `contains`.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::helpers::{as_limit, contains_float, equal};
use crate::keywords::{CompilationResult, Validate};
use crate::node::{SchemaNode, Scope};
use crate::paths::Location;

/// `items` as a single schema: applies to every element.
pub(crate) struct ItemsValidator {
    node: SchemaNode,
}

impl Validate for ItemsValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Array(items) => items.iter().all(|item| self.node.is_valid(item, scope)),
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
        if let Value::Array(items) = instance {
            for (idx, item) in items.iter().enumerate() {
                self.node.validate(item, &path.join(idx), scope, errors);
            }
        }
    }
}

/// `items` as an array: positional schemas.
pub(crate) struct TupleItemsValidator {
    nodes: Vec<SchemaNode>,
}

impl Validate for TupleItemsValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Array(items) => items
                .iter()
                .zip(&self.nodes)
                .all(|(item, node)| node.is_valid(item, scope)),
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
        if let Value::Array(items) = instance {
            for (idx, (item, node)) in items.iter().zip(&self.nodes).enumerate() {
                node.validate(item, &path.join(idx), scope, errors);
            }
        }
    }
}

pub(crate) fn compile_items(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    match value {
        Value::Array(schemas) => {
            let kw_ctx = ctx.at("items");
            let nodes = schemas
                .iter()
                .enumerate()
                .map(|(idx, schema)| kw_ctx.at(idx).compile(schema))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(TupleItemsValidator { nodes }))
        }
        _ => Ok(Box::new(ItemsValidator {
            node: ctx.at("items").compile(value)?,
        })),
    }
}

/// `additionalItems`: only meaningful next to a tuple `items`.
pub(crate) struct AdditionalItemsValidator {
    skip: usize,
    node: SchemaNode,
    location: Location,
}

impl Validate for AdditionalItemsValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Array(items) => items
                .iter()
                .skip(self.skip)
                .all(|item| self.node.is_valid(item, scope)),
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
        let Value::Array(items) = instance else {
            return;
        };
        if let SchemaNode::Boolean { valid: false, .. } = self.node {
            if items.len() > self.skip {
                errors.push(ValidationError::new(
                    ValidationErrorKind::AdditionalItems { limit: self.skip },
                    instance,
                    path,
                    &self.location,
                ));
            }
            return;
        }
        for (idx, item) in items.iter().enumerate().skip(self.skip) {
            self.node.validate(item, &path.join(idx), scope, errors);
        }
    }
}

pub(crate) fn compile_additional_items(
    ctx: &Context<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Option<CompilationResult> {
    let Some(Value::Array(tuple)) = parent.get("items") else {
        return None;
    };
    let compiled = ctx
        .at("additionalItems")
        .compile(value)
        .map(|node| -> Box<dyn Validate> {
            Box::new(AdditionalItemsValidator {
                skip: tuple.len(),
                node,
                location: ctx.location().join("additionalItems"),
            })
        });
    Some(compiled)
}

pub(crate) struct ItemCountValidator {
    limit: u64,
    min: bool,
    location: Location,
}

impl Validate for ItemCountValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::Array(items) => {
                let len = items.len() as u64;
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
            ValidationErrorKind::MinItems { limit: self.limit }
        } else {
            ValidationErrorKind::MaxItems { limit: self.limit }
        };
        errors.push(ValidationError::new(kind, instance, path, &self.location));
    }
}

pub(crate) fn compile_item_count(
    ctx: &Context<'_>,
    keyword: &str,
    value: &Value,
) -> CompilationResult {
    let limit =
        as_limit(value).ok_or_else(|| ctx.invalid(keyword, "expected a non-negative integer"))?;
    Ok(Box::new(ItemCountValidator {
        limit,
        min: keyword == "minItems",
        location: ctx.location().join(keyword),
    }))
}

pub(crate) struct UniqueItemsValidator {
    location: Location,
}

/// Linear for strings and float-free values. Arrays holding floats are
/// compared pairwise because JSON equality is not hash-compatible there
/// (`1 == 1.0`).
fn has_duplicates(items: &[Value]) -> bool {
    if items.len() < 2 {
        return false;
    }
    if items.iter().all(Value::is_string) {
        let mut seen = HashSet::with_capacity(items.len());
        return !items.iter().filter_map(Value::as_str).all(|s| seen.insert(s));
    }
    if !items.iter().any(contains_float) {
        let mut seen = HashSet::with_capacity(items.len());
        return !items.iter().all(|item| seen.insert(item.to_string()));
    }
    items
        .iter()
        .enumerate()
        .any(|(i, a)| items[i + 1..].iter().any(|b| equal(a, b)))
}

impl Validate for UniqueItemsValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::Array(items) => !has_duplicates(items),
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
                ValidationErrorKind::UniqueItems,
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_unique_items(ctx: &Context<'_>, value: &Value) -> Option<CompilationResult> {
    match value {
        Value::Bool(true) => Some(Ok(Box::new(UniqueItemsValidator {
            location: ctx.location().join("uniqueItems"),
        }))),
        Value::Bool(false) => None,
        _ => Some(Err(ctx.invalid("uniqueItems", "expected a boolean"))),
    }
}

pub(crate) struct ContainsValidator {
    node: SchemaNode,
    location: Location,
}

impl Validate for ContainsValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Array(items) => items.iter().any(|item| self.node.is_valid(item, scope)),
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
                ValidationErrorKind::Contains,
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile_contains(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(ContainsValidator {
        node: ctx.at("contains").compile(value)?,
        location: ctx.location().join("contains"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationErrorKind;
    use crate::Validator;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn items_reports_each_element() {
        let v = Validator::new(&json!({"items": {"type": "string", "minLength": 1}})).unwrap();
        let errors = v.iter_errors(&json!(["a", "", 3]));
        let paths: Vec<String> = errors.iter().map(|e| e.instance_path.as_pointer()).collect();
        assert_eq!(paths, vec!["/1", "/2"]);
    }

    #[test]
    fn tuple_items_with_additional_items_false() {
        let v = Validator::new(&json!({
            "items": [{"type": "integer"}, {"type": "string"}],
            "additionalItems": false
        }))
        .unwrap();
        assert!(v.is_valid(&json!([1, "a"])));
        assert!(v.is_valid(&json!([1])));
        let errors = v.iter_errors(&json!([1, "a", true]));
        assert_eq!(errors.len(), 1);
        assert_matches!(errors[0].kind, ValidationErrorKind::AdditionalItems { limit: 2 });
    }

    #[test]
    fn additional_items_ignored_without_tuple() {
        let v = Validator::new(&json!({"items": {}, "additionalItems": false})).unwrap();
        assert!(v.is_valid(&json!([1, 2, 3])));
    }

    #[test]
    fn unique_items_uses_json_equality() {
        let v = Validator::new(&json!({"uniqueItems": true})).unwrap();
        assert!(v.is_valid(&json!(["x", "y"])));
        assert!(!v.is_valid(&json!(["x", "x"])));
        assert!(!v.is_valid(&json!([1, 1.0])));
        assert!(!v.is_valid(&json!([{"a": 1}, {"a": 1}])));
        assert!(v.is_valid(&json!([])));
    }

    #[test]
    fn unique_items_mixed_values() {
        let v = Validator::new(&json!({"uniqueItems": true})).unwrap();
        assert!(v.is_valid(&json!([1, "1", true, null, [1], {"a": 1}])));
        assert!(!v.is_valid(&json!([[1, "a"], [1, "a"]])));
        assert!(!v.is_valid(&json!([{"a": [1, 2]}, {"a": [1.0, 2]}])));
        assert!(v.is_valid(&json!([1.5, 2.5, 1])));
        assert!(!v.is_valid(&json!([false, true, false])));
    }

    #[test]
    fn unique_items_scales_to_long_arrays() {
        let v = Validator::new(&json!({"uniqueItems": true})).unwrap();
        let mut tags: Vec<serde_json::Value> = (0..200_000).map(|i| json!(format!("t{i}"))).collect();
        assert!(v.is_valid(&json!(tags)));
        tags.push(json!("t0"));
        assert!(!v.is_valid(&json!(tags)));

        let numbers: Vec<serde_json::Value> = (0..200_000u64).map(|i| json!(i)).collect();
        assert!(v.is_valid(&json!(numbers)));
    }

    #[test]
    fn unique_items_false_is_noop() {
        let v = Validator::new(&json!({"uniqueItems": false})).unwrap();
        assert!(v.is_valid(&json!(["x", "x"])));
    }

    #[test]
    fn item_counts_and_contains() {
        let v = Validator::new(&json!({
            "minItems": 1,
            "maxItems": 2,
            "contains": {"const": 5}
        }))
        .unwrap();
        assert!(v.is_valid(&json!([5])));
        assert!(!v.is_valid(&json!([])));
        assert!(!v.is_valid(&json!([1, 2, 5])));
        let errors = v.iter_errors(&json!([1]));
        assert_matches!(errors[0].kind, ValidationErrorKind::Contains);
    }
}
