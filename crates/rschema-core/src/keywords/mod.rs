//! Keyword validators.
//!
//! Each supported keyword compiles into a value implementing [`Validate`].
//! Keywords that this crate does not implement (annotations such as `title`,
//! `description`, `default`, `definitions`, `$comment`) are skipped at compile
//! time, as are `format` names nobody registered.

use serde_json::{Map, Value};

use crate::compiler::Context;
use crate::error::ValidationError;
use crate::errors::RschemaResult;
use crate::node::Scope;
use crate::paths::Location;

pub(crate) mod array;
pub(crate) mod combinators;
pub(crate) mod content;
pub mod custom;
pub(crate) mod enum_const;
pub mod format;
pub(crate) mod numeric;
pub(crate) mod object;
pub(crate) mod ref_;
pub(crate) mod string;
pub(crate) mod type_;

/// A compiled keyword.
///
/// `is_valid` may short-circuit; `validate` must report every failure.
pub(crate) trait Validate: Send + Sync {
    fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool;

    fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    );
}

pub(crate) type BoxedValidator = Box<dyn Validate>;
pub(crate) type CompilationResult = RschemaResult<BoxedValidator>;

/// Compile one keyword of `parent`. Returns `None` for keywords without
/// validation semantics.
pub(crate) fn compile(
    ctx: &Context<'_>,
    parent: &Map<String, Value>,
    keyword: &str,
    value: &Value,
) -> Option<CompilationResult> {
    let compiled = match keyword {
        "type" => type_::compile(ctx, value),
        "enum" => enum_const::compile_enum(ctx, value),
        "const" => enum_const::compile_const(ctx, value),

        "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" => {
            numeric::compile_bound(ctx, keyword, value)
        }
        "multipleOf" => numeric::compile_multiple_of(ctx, value),

        "minLength" | "maxLength" => string::compile_length(ctx, keyword, value),
        "pattern" => string::compile_pattern(ctx, value),
        "format" => return format::compile(ctx, value),
        "contentEncoding" if ctx.draft().supports_content() => {
            return content::compile_encoding(ctx, parent, value)
        }
        "contentMediaType" if ctx.draft().supports_content() => {
            return content::compile_media_type(ctx, parent, value)
        }

        "items" => array::compile_items(ctx, value),
        "additionalItems" => return array::compile_additional_items(ctx, parent, value),
        "minItems" | "maxItems" => array::compile_item_count(ctx, keyword, value),
        "uniqueItems" => return array::compile_unique_items(ctx, value),
        "contains" => array::compile_contains(ctx, value),

        "required" => object::compile_required(ctx, value),
        "properties" => object::compile_properties(ctx, value),
        "patternProperties" => object::compile_pattern_properties(ctx, value),
        "additionalProperties" => object::compile_additional_properties(ctx, parent, value),
        "propertyNames" => object::compile_property_names(ctx, value),
        "minProperties" | "maxProperties" => object::compile_property_count(ctx, keyword, value),
        "dependencies" => object::compile_dependencies(ctx, value),

        "allOf" => combinators::compile_all_of(ctx, value),
        "anyOf" => combinators::compile_any_of(ctx, value),
        "oneOf" => combinators::compile_one_of(ctx, value),
        "not" => combinators::compile_not(ctx, value),
        "if" if ctx.draft().supports_conditionals() => {
            combinators::compile_if(ctx, parent, value)
        }

        _ => return None,
    };
    Some(compiled)
}

/// Compile every element of an array of subschemas (`allOf`, tuple `items`).
pub(crate) fn compile_schema_array(
    ctx: &Context<'_>,
    keyword: &str,
    value: &Value,
) -> RschemaResult<Vec<crate::node::SchemaNode>> {
    let items = value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ctx.invalid(keyword, "expected a non-empty array of schemas"))?;
    let kw_ctx = ctx.at(keyword);
    items
        .iter()
        .enumerate()
        .map(|(idx, schema)| kw_ctx.at(idx).compile(schema))
        .collect()
}
