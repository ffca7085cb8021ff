//! Compiled schema nodes.
//!
//! A [`SchemaNode`] is the compiled form of one (sub)schema: either a boolean
//! schema or an ordered list of keyword validators. Nodes targeted by `$ref`
//! live in a shared table and are addressed by index through [`Scope`], which
//! lets recursive schemas compile to a finite tree.

use serde_json::Value;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::keywords::BoxedValidator;
use crate::paths::Location;

pub(crate) enum SchemaNode {
    Boolean { valid: bool, location: Location },
    Keywords { validators: Vec<BoxedValidator> },
}

impl SchemaNode {
    pub(crate) fn boolean(valid: bool, location: Location) -> Self {
        Self::Boolean { valid, location }
    }

    pub(crate) fn keywords(validators: Vec<BoxedValidator>) -> Self {
        Self::Keywords { validators }
    }

    pub(crate) fn is_valid(&self, instance: &Value, scope: Scope<'_>) -> bool {
        match self {
            Self::Boolean { valid, .. } => *valid,
            Self::Keywords { validators } => validators.iter().all(|v| v.is_valid(instance, scope)),
        }
    }

    pub(crate) fn validate(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
        errors: &mut Vec<ValidationError>,
    ) {
        match self {
            Self::Boolean { valid: true, .. } => {}
            Self::Boolean {
                valid: false,
                location,
            } => errors.push(ValidationError::new(
                ValidationErrorKind::FalseSchema,
                instance,
                path,
                location,
            )),
            Self::Keywords { validators } => {
                for v in validators {
                    v.validate(instance, path, scope, errors);
                }
            }
        }
    }

    /// Collect errors into a fresh vector.
    pub(crate) fn errors(
        &self,
        instance: &Value,
        path: &Location,
        scope: Scope<'_>,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate(instance, path, scope, &mut errors);
        errors
    }
}

/// Evaluation scope: the `$ref` table and the current reference depth.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    refs: &'a [SchemaNode],
    depth: usize,
    max_depth: usize,
}

impl<'a> Scope<'a> {
    pub(crate) fn new(refs: &'a [SchemaNode], max_depth: usize) -> Self {
        Self {
            refs,
            depth: 0,
            max_depth,
        }
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Enter the referenced node at `index`, or `None` once the depth limit
    /// is reached.
    pub(crate) fn enter(self, index: usize) -> Option<(&'a SchemaNode, Scope<'a>)> {
        if self.depth >= self.max_depth {
            return None;
        }
        let node = self.refs.get(index)?;
        Some((
            node,
            Scope {
                depth: self.depth + 1,
                ..self
            },
        ))
    }
}
