//! Schema compilation.
//!
//! Turns a schema `Value` into a tree of [`SchemaNode`]s. Compilation is a
//! single pass over the document plus a worklist for `$ref` targets:
//! - every distinct reference pointer gets a slot in the reference table
//! - targets are compiled once, after the root
//! - recursive references resolve to the same slot, so cycles terminate
//!
//! Only local references (`#`, `#/definitions/x`, any `#/...` pointer) are
//! resolvable. Remote documents are never fetched.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::debug;

use crate::draft::Draft;
use crate::errors::{RschemaError, RschemaResult};
use crate::keywords::{self, custom::KeywordFactory, format::FormatCheck};
use crate::node::SchemaNode;
use crate::paths::{Location, LocationSegment};
use crate::validator::ValidationOptions;

#[derive(Default)]
struct RefTable {
    slots: HashMap<String, usize>,
    pending: Vec<(String, usize)>,
}

/// Shared compilation state.
struct Shared<'a> {
    root: &'a Value,
    draft: Draft,
    options: &'a ValidationOptions,
    refs: RefCell<RefTable>,
}

/// Compilation context for one schema location.
pub(crate) struct Context<'a> {
    shared: &'a Shared<'a>,
    location: Location,
}

impl<'a> Context<'a> {
    pub(crate) fn draft(&self) -> Draft {
        self.shared.draft
    }

    /// Schema location of the current subschema.
    pub(crate) fn location(&self) -> &Location {
        &self.location
    }

    /// Context for a subschema below the current one.
    pub(crate) fn at(&self, segment: impl Into<LocationSegment>) -> Context<'a> {
        Context {
            shared: self.shared,
            location: self.location.join(segment),
        }
    }

    pub(crate) fn invalid(&self, keyword: &str, message: impl Into<String>) -> RschemaError {
        RschemaError::invalid_schema(self.location.join(keyword).as_pointer(), message)
    }

    pub(crate) fn custom_keyword(&self, keyword: &str) -> Option<&KeywordFactory> {
        self.shared.options.keywords.get(keyword)
    }

    /// User-registered check for a format name.
    pub(crate) fn format_check(&self, name: &str) -> Option<&FormatCheck> {
        self.shared.options.formats.get(name)
    }

    pub(crate) fn validate_formats(&self) -> bool {
        self.shared.options.validate_formats
    }

    pub(crate) fn ignore_unknown_formats(&self) -> bool {
        self.shared.options.ignore_unknown_formats
    }

    /// Compile a subschema located at `self.location`.
    pub(crate) fn compile(&self, schema: &Value) -> RschemaResult<SchemaNode> {
        compile_node(self, schema)
    }

    /// Reserve (or reuse) the reference-table slot for a `$ref` value.
    pub(crate) fn reference_slot(&self, reference: &str) -> RschemaResult<usize> {
        let pointer = local_pointer(reference).ok_or_else(|| {
            self.invalid(
                "$ref",
                format!("only local references are supported, got '{reference}'"),
            )
        })?;
        if self.shared.root.pointer(&pointer).is_none() {
            return Err(self.invalid("$ref", format!("unresolvable reference '{reference}'")));
        }

        let mut table = self.shared.refs.borrow_mut();
        if let Some(slot) = table.slots.get(&pointer) {
            return Ok(*slot);
        }
        let slot = table.slots.len();
        table.slots.insert(pointer.clone(), slot);
        table.pending.push((pointer, slot));
        Ok(slot)
    }
}

/// Output of a successful compilation.
pub(crate) struct Compiled {
    pub(crate) root: SchemaNode,
    pub(crate) refs: Vec<SchemaNode>,
}

pub(crate) fn compile(
    schema: &Value,
    draft: Draft,
    options: &ValidationOptions,
) -> RschemaResult<Compiled> {
    let shared = Shared {
        root: schema,
        draft,
        options,
        refs: RefCell::new(RefTable::default()),
    };
    let root_ctx = Context {
        shared: &shared,
        location: Location::new(),
    };
    let root = root_ctx.compile(schema)?;

    let mut compiled: BTreeMap<usize, SchemaNode> = BTreeMap::new();
    loop {
        let next = shared.refs.borrow_mut().pending.pop();
        let Some((pointer, slot)) = next else { break };

        let target = schema.pointer(&pointer).ok_or_else(|| {
            RschemaError::invariant(format!("reference target vanished: {pointer}"))
        })?;
        let location = Location::from_pointer(&pointer)
            .ok_or_else(|| RschemaError::invariant(format!("bad pointer: {pointer}")))?;
        let ctx = Context {
            shared: &shared,
            location,
        };
        compiled.insert(slot, ctx.compile(target)?);
    }

    // Slots are dense: 0..n, each compiled exactly once.
    let refs: Vec<SchemaNode> = compiled.into_values().collect();
    if refs.len() != shared.refs.borrow().slots.len() {
        return Err(RschemaError::invariant("reference table is incomplete"));
    }

    debug!(draft = ?draft, references = refs.len(), "compiled schema");
    Ok(Compiled { root, refs })
}

fn compile_node(ctx: &Context<'_>, schema: &Value) -> RschemaResult<SchemaNode> {
    let map = match schema {
        Value::Bool(valid) => return Ok(SchemaNode::boolean(*valid, ctx.location().clone())),
        Value::Object(map) => map,
        _ => {
            return Err(RschemaError::invalid_schema(
                ctx.location().as_pointer(),
                "a schema must be an object or a boolean",
            ))
        }
    };

    // In draft-06/07, `$ref` overrides every sibling keyword.
    if let Some(reference) = map.get("$ref") {
        let validator = keywords::ref_::compile(ctx, reference)?;
        return Ok(SchemaNode::keywords(vec![validator]));
    }

    let mut validators = Vec::new();
    for (keyword, value) in map {
        if let Some(factory) = ctx.custom_keyword(keyword) {
            validators.push(keywords::custom::compile(ctx, keyword, factory, map, value)?);
            continue;
        }
        if let Some(validator) = keywords::compile(ctx, map, keyword, value) {
            validators.push(validator?);
        }
    }
    Ok(SchemaNode::keywords(validators))
}

/// Map a `$ref` value to a JSON pointer into the root document.
fn local_pointer(reference: &str) -> Option<String> {
    let fragment = reference.strip_prefix('#')?;
    if fragment.is_empty() || fragment.starts_with('/') {
        Some(percent_decode(fragment))
    } else {
        None
    }
}

/// URI fragments may percent-encode pointer characters (`%25` for `%`).
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| s.to_string())
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile_default(schema: &Value) -> RschemaResult<Compiled> {
        compile(schema, Draft::Draft7, &ValidationOptions::default())
    }

    #[test]
    fn local_pointer_forms() {
        assert_eq!(local_pointer("#").as_deref(), Some(""));
        assert_eq!(
            local_pointer("#/definitions/a").as_deref(),
            Some("/definitions/a")
        );
        assert_eq!(local_pointer("#/a%25b").as_deref(), Some("/a%b"));
        assert_eq!(local_pointer("other.json#/a"), None);
        assert_eq!(local_pointer("#anchor"), None);
    }

    #[test]
    fn shared_references_compile_once() {
        let schema = json!({
            "definitions": {"s": {"type": "string"}},
            "properties": {
                "a": {"$ref": "#/definitions/s"},
                "b": {"$ref": "#/definitions/s"}
            }
        });
        let compiled = compile_default(&schema).unwrap();
        assert_eq!(compiled.refs.len(), 1);
    }

    #[test]
    fn recursive_reference_terminates() {
        let schema = json!({
            "type": "object",
            "properties": {"child": {"$ref": "#"}}
        });
        let compiled = compile_default(&schema).unwrap();
        assert_eq!(compiled.refs.len(), 1);
    }

    #[test]
    fn unresolvable_reference_is_an_error() {
        let schema = json!({"properties": {"a": {"$ref": "#/definitions/missing"}}});
        let err = compile_default(&schema).err().unwrap();
        let s = err.to_string();
        assert!(s.contains("/properties/a/$ref"), "{s}");
        assert!(s.contains("unresolvable"), "{s}");
    }

    #[test]
    fn remote_reference_is_rejected() {
        let schema = json!({"$ref": "http://example.com/schema.json"});
        let err = compile_default(&schema).err().unwrap();
        assert!(err.to_string().contains("only local references"));
    }

    #[test]
    fn non_schema_values_are_rejected() {
        let err = compile_default(&json!({"items": 3})).err().unwrap();
        assert!(err.to_string().contains("/items"));
    }
}
