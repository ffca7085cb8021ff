//! Object keywords: `required`, `properties`, `patternProperties`,
//! `additionalProperties`, `propertyNames`, `minProperties`, `maxProperties`,
//! `dependencies`.

use regex::Regex;
use serde_json::{Map, Value};

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::errors::RschemaResult;
use crate::helpers::as_limit;
use crate::keywords::string::compile_regex;
use crate::keywords::{CompilationResult, Validate};
use crate::node::{SchemaNode, Scope};
use crate::paths::Location;

pub(crate) struct RequiredValidator {
    required: Vec<String>,
    location: Location,
}

impl Validate for RequiredValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::Object(map) => self.required.iter().all(|p| map.contains_key(p)),
            _ => true,
        }
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        _: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        let Value::Object(map) = instance else {
            return;
        };
        for property in &self.required {
            if !map.contains_key(property) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::Required {
                        property: property.clone(),
                    },
                    instance,
                    path,
                    &self.location,
                ));
            }
        }
    }
}

fn string_array(ctx: &Context<'_>, keyword: &str, value: &Value) -> RschemaResult<Vec<String>> {
    let items = value
        .as_array()
        .ok_or_else(|| ctx.invalid(keyword, "expected an array of strings"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| ctx.invalid(keyword, format!("expected a string, got {item}")))
        })
        .collect()
}

pub(crate) fn compile_required(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(RequiredValidator {
        required: string_array(ctx, "required", value)?,
        location: ctx.location().join("required"),
    }))
}

pub(crate) struct PropertiesValidator {
    properties: Vec<(String, SchemaNode)>,
}

impl Validate for PropertiesValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Object(map) => self.properties.iter().all(|(name, node)| {
                map.get(name).map_or(true, |value| node.is_valid(value, scope))
            }),
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
        let Value::Object(map) = instance else {
            return;
        };
        for (name, node) in &self.properties {
            if let Some(value) = map.get(name) {
                node.validate(value, &path.join(name.as_str()), scope, errors);
            }
        }
    }
}

pub(crate) fn compile_properties(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    let map = value
        .as_object()
        .ok_or_else(|| ctx.invalid("properties", "expected an object"))?;
    let kw_ctx = ctx.at("properties");
    let properties = map
        .iter()
        .map(|(name, schema)| Ok((name.clone(), kw_ctx.at(name.as_str()).compile(schema)?)))
        .collect::<RschemaResult<Vec<_>>>()?;
    Ok(Box::new(PropertiesValidator { properties }))
}

pub(crate) struct PatternPropertiesValidator {
    patterns: Vec<(Regex, SchemaNode)>,
}

impl Validate for PatternPropertiesValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Object(map) => map.iter().all(|(key, value)| {
                self.patterns
                    .iter()
                    .filter(|(re, _)| re.is_match(key))
                    .all(|(_, node)| node.is_valid(value, scope))
            }),
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
        let Value::Object(map) = instance else {
            return;
        };
        for (key, value) in map {
            for (re, node) in &self.patterns {
                if re.is_match(key) {
                    node.validate(value, &path.join(key.as_str()), scope, errors);
                }
            }
        }
    }
}

fn compile_patterns(ctx: &Context<'_>, value: &Value) -> RschemaResult<Vec<(Regex, SchemaNode)>> {
    let map = value
        .as_object()
        .ok_or_else(|| ctx.invalid("patternProperties", "expected an object"))?;
    let kw_ctx = ctx.at("patternProperties");
    map.iter()
        .map(|(pattern, schema)| {
            let re = compile_regex(ctx, "patternProperties", pattern)?;
            Ok((re, kw_ctx.at(pattern.as_str()).compile(schema)?))
        })
        .collect()
}

pub(crate) fn compile_pattern_properties(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(PatternPropertiesValidator {
        patterns: compile_patterns(ctx, value)?,
    }))
}

/// `additionalProperties`: applies to members matched by neither
/// `properties` nor `patternProperties` of the same schema.
pub(crate) struct AdditionalPropertiesValidator {
    known: Vec<String>,
    patterns: Vec<Regex>,
    node: SchemaNode,
    location: Location,
}

impl AdditionalPropertiesValidator {
    fn is_additional(&self, key: &str) -> bool {
        !self.known.iter().any(|k| k == key) && !self.patterns.iter().any(|re| re.is_match(key))
    }
}

impl Validate for AdditionalPropertiesValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Object(map) => map
                .iter()
                .filter(|(key, _)| self.is_additional(key))
                .all(|(_, value)| self.node.is_valid(value, scope)),
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
        let Value::Object(map) = instance else {
            return;
        };
        if let SchemaNode::Boolean { valid: false, .. } = self.node {
            let unexpected: Vec<String> = map
                .keys()
                .filter(|key| self.is_additional(key))
                .cloned()
                .collect();
            if !unexpected.is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::AdditionalProperties { unexpected },
                    instance,
                    path,
                    &self.location,
                ));
            }
            return;
        }
        for (key, value) in map {
            if self.is_additional(key) {
                self.node
                    .validate(value, &path.join(key.as_str()), scope, errors);
            }
        }
    }
}

pub(crate) fn compile_additional_properties(
    ctx: &Context<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> CompilationResult {
    let known = parent
        .get("properties")
        .and_then(Value::as_object)
        .map(|m| m.keys().cloned().collect())
        .unwrap_or_default();
    let patterns = match parent.get("patternProperties").and_then(Value::as_object) {
        Some(m) => m
            .keys()
            .map(|p| compile_regex(ctx, "patternProperties", p))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };
    Ok(Box::new(AdditionalPropertiesValidator {
        known,
        patterns,
        node: ctx.at("additionalProperties").compile(value)?,
        location: ctx.location().join("additionalProperties"),
    }))
}

pub(crate) struct PropertyNamesValidator {
    node: SchemaNode,
    location: Location,
}

impl Validate for PropertyNamesValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match instance {
            Value::Object(map) => map
                .keys()
                .all(|key| self.node.is_valid(&Value::String(key.clone()), scope)),
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
        let Value::Object(map) = instance else {
            return;
        };
        for key in map.keys() {
            let wrapper = Value::String(key.clone());
            for error in self.node.errors(&wrapper, path, scope) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PropertyNames {
                        property: key.clone(),
                        error: Box::new(error),
                    },
                    instance,
                    path,
                    &self.location,
                ));
            }
        }
    }
}

pub(crate) fn compile_property_names(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    Ok(Box::new(PropertyNamesValidator {
        node: ctx.at("propertyNames").compile(value)?,
        location: ctx.location().join("propertyNames"),
    }))
}

pub(crate) struct PropertyCountValidator {
    limit: u64,
    min: bool,
    location: Location,
}

impl Validate for PropertyCountValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::Object(map) => {
                let len = map.len() as u64;
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
            ValidationErrorKind::MinProperties { limit: self.limit }
        } else {
            ValidationErrorKind::MaxProperties { limit: self.limit }
        };
        errors.push(ValidationError::new(kind, instance, path, &self.location));
    }
}

pub(crate) fn compile_property_count(
    ctx: &Context<'_>,
    keyword: &str,
    value: &Value,
) -> CompilationResult {
    let limit =
        as_limit(value).ok_or_else(|| ctx.invalid(keyword, "expected a non-negative integer"))?;
    Ok(Box::new(PropertyCountValidator {
        limit,
        min: keyword == "minProperties",
        location: ctx.location().join(keyword),
    }))
}

enum Dependency {
    Properties(Vec<String>),
    Schema(SchemaNode),
}

pub(crate) struct DependenciesValidator {
    dependencies: Vec<(String, Dependency)>,
    location: Location,
}

impl Validate for DependenciesValidator {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        let Value::Object(map) = instance else {
            return true;
        };
        self.dependencies
            .iter()
            .filter(|(trigger, _)| map.contains_key(trigger))
            .all(|(_, dep)| match dep {
                Dependency::Properties(required) => required.iter().all(|p| map.contains_key(p)),
                Dependency::Schema(node) => node.is_valid(instance, scope),
            })
    }

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        let Value::Object(map) = instance else {
            return;
        };
        for (trigger, dep) in &self.dependencies {
            if !map.contains_key(trigger) {
                continue;
            }
            match dep {
                Dependency::Properties(required) => {
                    let location = self.location.join(trigger.as_str());
                    for property in required.iter().filter(|p| !map.contains_key(*p)) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::Required {
                                property: property.clone(),
                            },
                            instance,
                            path,
                            &location,
                        ));
                    }
                }
                Dependency::Schema(node) => node.validate(instance, path, scope, errors),
            }
        }
    }
}

pub(crate) fn compile_dependencies(ctx: &Context<'_>, value: &Value) -> CompilationResult {
    let map = value
        .as_object()
        .ok_or_else(|| ctx.invalid("dependencies", "expected an object"))?;
    let kw_ctx = ctx.at("dependencies");
    let mut dependencies = Vec::with_capacity(map.len());
    for (trigger, dep) in map {
        let compiled = match dep {
            Value::Array(_) => {
                Dependency::Properties(string_array(&kw_ctx, trigger.as_str(), dep)?)
            }
            _ => Dependency::Schema(kw_ctx.at(trigger.as_str()).compile(dep)?),
        };
        dependencies.push((trigger.clone(), compiled));
    }
    Ok(Box::new(DependenciesValidator {
        dependencies,
        location: ctx.location().join("dependencies"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationErrorKind;
    use crate::Validator;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn required_reports_every_missing_property() {
        let v = Validator::new(&json!({"required": ["id", "name"]})).unwrap();
        let errors = v.iter_errors(&json!({}));
        let missing: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            missing,
            vec!["\"id\" is a required property", "\"name\" is a required property"]
        );
        // Non-objects are out of scope for `required`.
        assert!(v.is_valid(&json!([])));
    }

    #[test]
    fn properties_descend_with_paths() {
        let v = Validator::new(&json!({"properties": {"a": {"type": "string"}}})).unwrap();
        let errors = v.iter_errors(&json!({"a": 1, "b": 2}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].instance_path.as_pointer(), "/a");
        assert_eq!(errors[0].schema_path.as_pointer(), "/properties/a/type");
    }

    #[test]
    fn additional_properties_false_lists_unexpected() {
        let v = Validator::new(&json!({
            "properties": {"a": {}},
            "patternProperties": {"^x-": {}},
            "additionalProperties": false
        }))
        .unwrap();
        assert!(v.is_valid(&json!({"a": 1, "x-trace": 2})));
        let errors = v.iter_errors(&json!({"a": 1, "b": 2, "c": 3}));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "Additional properties are not allowed (\"b\", \"c\" were unexpected)"
        );
    }

    #[test]
    fn additional_properties_schema_applies_per_value() {
        let v = Validator::new(&json!({"additionalProperties": {"type": "integer"}})).unwrap();
        let errors = v.iter_errors(&json!({"a": 1, "b": "x", "c": null}));
        let paths: Vec<String> = errors.iter().map(|e| e.instance_path.as_pointer()).collect();
        assert_eq!(paths, vec!["/b", "/c"]);
    }

    #[test]
    fn property_names_wrap_inner_errors() {
        let v = Validator::new(&json!({"propertyNames": {"minLength": 2}})).unwrap();
        let errors = v.iter_errors(&json!({"ab": 1, "c": 2}));
        assert_eq!(errors.len(), 1);
        assert_matches!(
            &errors[0].kind,
            ValidationErrorKind::PropertyNames { property, error }
                if property == "c" && matches!(error.kind, ValidationErrorKind::MinLength { limit: 2 })
        );
        assert_eq!(errors[0].to_string(), "\"c\" is shorter than 2 characters");
    }

    #[test]
    fn property_counts() {
        let v = Validator::new(&json!({"minProperties": 1, "maxProperties": 1})).unwrap();
        assert!(v.is_valid(&json!({"a": 1})));
        assert!(!v.is_valid(&json!({})));
        assert!(!v.is_valid(&json!({"a": 1, "b": 2})));
    }

    #[test]
    fn dependencies_both_forms() {
        let v = Validator::new(&json!({
            "dependencies": {
                "card": ["billing"],
                "vip": {"required": ["tier"]}
            }
        }))
        .unwrap();
        assert!(v.is_valid(&json!({"other": 1})));
        assert!(v.is_valid(&json!({"card": 1, "billing": 2})));
        assert!(!v.is_valid(&json!({"card": 1})));
        assert!(!v.is_valid(&json!({"vip": true})));
        let errors = v.iter_errors(&json!({"card": 1}));
        assert_eq!(errors[0].schema_path.as_pointer(), "/dependencies/card");
    }
}
