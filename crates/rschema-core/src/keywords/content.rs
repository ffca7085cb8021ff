//! `contentEncoding` and `contentMediaType` (draft-07).
//!
//! Known values are `base64` and `application/json`; anything else is an
//! annotation. When both keywords are present the media type applies to the
//! decoded bytes, and an undecodable string fails only `contentEncoding`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value};

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::errors::RschemaResult;
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

#[derive(Clone, Copy)]
enum Encoding {
    Base64,
}

impl Encoding {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "base64" => Some(Self::Base64),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Base64 => "base64",
        }
    }

    fn decode(self, s: &str) -> Option<Vec<u8>> {
        match self {
            Self::Base64 => STANDARD.decode(s).ok(),
        }
    }
}

#[derive(Clone, Copy)]
enum MediaType {
    Json,
}

impl MediaType {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "application/json" => Some(Self::Json),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Json => "application/json",
        }
    }

    fn accepts(self, bytes: &[u8]) -> bool {
        match self {
            Self::Json => serde_json::from_slice::<Value>(bytes).is_ok(),
        }
    }
}

/// Either keyword alone, or both together.
pub(crate) struct ContentValidator {
    encoding: Option<(Encoding, Location)>,
    media_type: Option<(MediaType, Location)>,
}

impl ContentValidator {
    /// The first failing keyword, if any.
    fn failure(&self, s: &str) -> Option<(ValidationErrorKind, &Location)> {
        let decoded;
        let bytes = match &self.encoding {
            Some((encoding, location)) => match encoding.decode(s) {
                Some(bytes) => {
                    decoded = bytes;
                    decoded.as_slice()
                }
                None => {
                    let kind = ValidationErrorKind::ContentEncoding {
                        encoding: encoding.name().to_string(),
                    };
                    return Some((kind, location));
                }
            },
            None => s.as_bytes(),
        };
        match &self.media_type {
            Some((media_type, location)) if !media_type.accepts(bytes) => {
                let kind = ValidationErrorKind::ContentMediaType {
                    media_type: media_type.name().to_string(),
                };
                Some((kind, location))
            }
            _ => None,
        }
    }
}

impl Validate for ContentValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::String(s) => self.failure(s).is_none(),
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
        if let Value::String(s) = instance {
            if let Some((kind, location)) = self.failure(s) {
                errors.push(ValidationError::new(kind, instance, path, location));
            }
        }
    }
}

fn known_encoding(ctx: &Context<'_>, value: &Value) -> RschemaResult<Option<Encoding>> {
    value
        .as_str()
        .map(Encoding::parse)
        .ok_or_else(|| ctx.invalid("contentEncoding", "expected a string"))
}

fn known_media_type(ctx: &Context<'_>, value: &Value) -> RschemaResult<Option<MediaType>> {
    value
        .as_str()
        .map(MediaType::parse)
        .ok_or_else(|| ctx.invalid("contentMediaType", "expected a string"))
}

/// `contentEncoding`, absorbing a sibling `contentMediaType`.
pub(crate) fn compile_encoding(
    ctx: &Context<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Option<CompilationResult> {
    let encoding = match known_encoding(ctx, value) {
        Ok(Some(encoding)) => encoding,
        Ok(None) => return None,
        Err(e) => return Some(Err(e)),
    };
    let media_type = match parent.get("contentMediaType").map(|v| known_media_type(ctx, v)) {
        Some(Ok(media_type)) => media_type,
        Some(Err(e)) => return Some(Err(e)),
        None => None,
    };
    Some(Ok(Box::new(ContentValidator {
        encoding: Some((encoding, ctx.location().join("contentEncoding"))),
        media_type: media_type.map(|m| (m, ctx.location().join("contentMediaType"))),
    })))
}

/// `contentMediaType` on its own. Left to [`compile_encoding`] when a known
/// encoding sits next to it.
pub(crate) fn compile_media_type(
    ctx: &Context<'_>,
    parent: &Map<String, Value>,
    value: &Value,
) -> Option<CompilationResult> {
    let media_type = match known_media_type(ctx, value) {
        Ok(Some(media_type)) => media_type,
        Ok(None) => return None,
        Err(e) => return Some(Err(e)),
    };
    if let Some(Ok(Some(_))) = parent.get("contentEncoding").map(|v| known_encoding(ctx, v)) {
        return None;
    }
    Some(Ok(Box::new(ContentValidator {
        encoding: None,
        media_type: Some((media_type, ctx.location().join("contentMediaType"))),
    })))
}

#[cfg(test)]
mod tests {
    use crate::draft::Draft;
    use crate::Validator;
    use serde_json::json;

    #[test]
    fn base64_encoding() {
        let v = Validator::new(&json!({"contentEncoding": "base64"})).unwrap();
        assert!(v.is_valid(&json!("aGVsbG8=")));
        assert!(v.is_valid(&json!(12)));
        let errors = v.iter_errors(&json!("not base64!"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind.keyword(), "contentEncoding");
        assert_eq!(errors[0].schema_path.as_pointer(), "/contentEncoding");
    }

    #[test]
    fn json_media_type() {
        let v = Validator::new(&json!({"contentMediaType": "application/json"})).unwrap();
        assert!(v.is_valid(&json!("{\"a\": [1, 2]}")));
        let errors = v.iter_errors(&json!("{a"));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "\"{a\" is not compliant with \"application/json\""
        );
    }

    #[test]
    fn media_type_applies_to_decoded_bytes() {
        let v = Validator::new(&json!({
            "contentEncoding": "base64",
            "contentMediaType": "application/json"
        }))
        .unwrap();
        // {"a": 1}
        assert!(v.is_valid(&json!("eyJhIjogMX0=")));

        // "{a"
        let errors = v.iter_errors(&json!("e2E="));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].schema_path.as_pointer(), "/contentMediaType");

        let errors = v.iter_errors(&json!("%%%"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].schema_path.as_pointer(), "/contentEncoding");
    }

    #[test]
    fn unknown_values_are_annotations() {
        let v = Validator::new(&json!({
            "contentEncoding": "quoted-printable",
            "contentMediaType": "image/png"
        }))
        .unwrap();
        assert!(v.is_valid(&json!("anything")));
    }

    #[test]
    fn draft6_ignores_content_keywords() {
        let v = Validator::options()
            .with_draft(Draft::Draft6)
            .build(&json!({"contentEncoding": "base64"}))
            .unwrap();
        assert!(v.is_valid(&json!("not base64!")));
    }

    #[test]
    fn non_string_values_are_schema_errors() {
        assert!(Validator::new(&json!({"contentEncoding": 64})).is_err());
        assert!(Validator::new(&json!({"contentMediaType": true})).is_err());
    }
}
