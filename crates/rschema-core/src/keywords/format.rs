//! `format`.
//!
//! Only strings are checked. A check registered through
//! [`ValidationOptions::with_format`](crate::ValidationOptions::with_format)
//! shadows the built-in of the same name.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use url::Url;

use crate::compiler::Context;
use crate::error::{ValidationError, ValidationErrorKind};
use crate::keywords::{CompilationResult, Validate};
use crate::node::Scope;
use crate::paths::Location;

/// A string predicate for one format name.
pub type FormatCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

fn is_date_time(s: &str) -> bool {
    OffsetDateTime::parse(s, &Rfc3339).is_ok()
}

fn is_date(s: &str) -> bool {
    s.len() == 10 && is_date_time(&format!("{s}T00:00:00Z"))
}

fn is_time(s: &str) -> bool {
    is_date_time(&format!("1970-01-01T{s}"))
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !s.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// RFC 1123 host name: dot-separated labels of 1..=63 alphanumerics or `-`.
fn is_hostname(s: &str) -> bool {
    let s = s.strip_suffix('.').unwrap_or(s);
    !s.is_empty()
        && s.len() <= 253
        && s.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

fn is_uri(s: &str) -> bool {
    Url::parse(s).is_ok()
}

fn is_uri_reference(s: &str) -> bool {
    if s.contains(char::is_whitespace) || s.contains('\\') {
        return false;
    }
    match Url::parse("http://localhost/") {
        Ok(base) => base.join(s).is_ok(),
        Err(_) => false,
    }
}

/// RFC 6901: empty, or `/`-prefixed tokens where `~` escapes only `0` and `1`.
fn is_json_pointer(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    if !s.starts_with('/') {
        return false;
    }
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return false;
        }
    }
    true
}

fn is_relative_json_pointer(s: &str) -> bool {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || (digits > 1 && s.starts_with('0')) {
        return false;
    }
    let rest = &s[digits..];
    rest == "#" || is_json_pointer(rest)
}

fn is_regex(s: &str) -> bool {
    Regex::new(s).is_ok()
}

fn builtin(name: &str) -> Option<fn(&str) -> bool> {
    let check: fn(&str) -> bool = match name {
        "date" => is_date,
        "date-time" => is_date_time,
        "time" => is_time,
        "email" => is_email,
        "hostname" => is_hostname,
        "ipv4" => is_ipv4,
        "ipv6" => is_ipv6,
        "uri" => is_uri,
        "uri-reference" => is_uri_reference,
        "json-pointer" => is_json_pointer,
        "relative-json-pointer" => is_relative_json_pointer,
        "regex" => is_regex,
        _ => return None,
    };
    Some(check)
}

pub(crate) struct FormatValidator {
    format: String,
    check: FormatCheck,
    location: Location,
}

impl Validate for FormatValidator {
    fn is_valid(&self, instance: &Value, _: Scope<'_>) -> bool {
        match instance {
            Value::String(s) => (self.check)(s),
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
                ValidationErrorKind::Format {
                    format: self.format.clone(),
                },
                instance,
                path,
                &self.location,
            ));
        }
    }
}

pub(crate) fn compile(ctx: &Context<'_>, value: &Value) -> Option<CompilationResult> {
    let Some(name) = value.as_str() else {
        return Some(Err(ctx.invalid("format", "expected a string")));
    };
    if !ctx.validate_formats() {
        return None;
    }
    let check = match (ctx.format_check(name), builtin(name)) {
        (Some(check), _) => Arc::clone(check),
        (None, Some(check)) => Arc::new(check) as FormatCheck,
        (None, None) if ctx.ignore_unknown_formats() => return None,
        (None, None) => {
            return Some(Err(ctx.invalid("format", format!("unknown format '{name}'"))));
        }
    };
    Some(Ok(Box::new(FormatValidator {
        format: name.to_string(),
        check,
        location: ctx.location().join("format"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Validator;
    use serde_json::json;

    fn accepts(format: &str, s: &str) -> bool {
        Validator::new(&json!({"format": format}))
            .unwrap()
            .is_valid(&json!(s))
    }

    #[test]
    fn dates_and_times() {
        assert!(accepts("date", "2024-02-29"));
        assert!(!accepts("date", "2023-02-29"));
        assert!(!accepts("date", "2024-2-9"));
        assert!(accepts("date-time", "2024-05-01T12:30:00Z"));
        assert!(accepts("date-time", "2024-05-01T12:30:00.25+02:00"));
        assert!(!accepts("date-time", "2024-05-01 12:30"));
        assert!(accepts("time", "08:15:00Z"));
        assert!(!accepts("time", "25:00:00Z"));
    }

    #[test]
    fn network_formats() {
        assert!(accepts("email", "ops@example.com"));
        assert!(!accepts("email", "ops.example.com"));
        assert!(!accepts("email", "a@b@c"));
        assert!(accepts("hostname", "api.example.com"));
        assert!(!accepts("hostname", "-bad.example.com"));
        assert!(accepts("ipv4", "192.168.0.1"));
        assert!(!accepts("ipv4", "256.1.1.1"));
        assert!(accepts("ipv6", "::1"));
        assert!(!accepts("ipv6", "12345::"));
        assert!(accepts("uri", "https://example.com/a?b=c"));
        assert!(!accepts("uri", "/relative/path"));
        assert!(accepts("uri-reference", "/relative/path"));
        assert!(!accepts("uri-reference", "\\\\share\\file"));
    }

    #[test]
    fn pointers_and_regexes() {
        assert!(accepts("json-pointer", ""));
        assert!(accepts("json-pointer", "/a~1b/0"));
        assert!(!accepts("json-pointer", "/a~2"));
        assert!(!accepts("json-pointer", "a"));
        assert!(accepts("relative-json-pointer", "1/a"));
        assert!(accepts("relative-json-pointer", "0#"));
        assert!(!accepts("relative-json-pointer", "01/a"));
        assert!(accepts("regex", "^[a-z]+$"));
        assert!(!accepts("regex", "(unclosed"));
    }

    #[test]
    fn non_strings_are_ignored() {
        let v = Validator::new(&json!({"format": "date"})).unwrap();
        assert!(v.is_valid(&json!(20240101)));
        assert!(v.is_valid(&json!(null)));
    }

    #[test]
    fn error_shape() {
        let v = Validator::new(&json!({"properties": {"at": {"format": "date"}}})).unwrap();
        let errors = v.iter_errors(&json!({"at": "yesterday"}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind.keyword(), "format");
        assert_eq!(errors[0].to_string(), "\"yesterday\" is not a \"date\"");
        assert_eq!(errors[0].instance_path.as_pointer(), "/at");
        assert_eq!(errors[0].schema_path.as_pointer(), "/properties/at/format");
    }

    #[test]
    fn registered_format_shadows_builtin() {
        let v = Validator::options()
            .with_format("sku", |s| s.starts_with("SKU-"))
            .with_format("date", |s| s == "today")
            .build(&json!({"items": [{"format": "sku"}, {"format": "date"}]}))
            .unwrap();
        assert!(v.is_valid(&json!(["SKU-1", "today"])));
        assert!(!v.is_valid(&json!(["1", "today"])));
        assert!(!v.is_valid(&json!(["SKU-1", "2024-01-01"])));
    }

    #[test]
    fn assertions_can_be_disabled() {
        let v = Validator::options()
            .should_validate_formats(false)
            .build(&json!({"format": "date"}))
            .unwrap();
        assert!(v.is_valid(&json!("not a date")));
    }

    #[test]
    fn unknown_formats() {
        let v = Validator::new(&json!({"format": "color"})).unwrap();
        assert!(v.is_valid(&json!("mauve")));

        let err = Validator::options()
            .should_ignore_unknown_formats(false)
            .build(&json!({"format": "color"}))
            .err()
            .unwrap();
        let s = err.to_string();
        assert!(s.contains("/format"), "{s}");
        assert!(s.contains("unknown format 'color'"), "{s}");
    }

    #[test]
    fn format_must_be_a_string() {
        assert!(Validator::new(&json!({"format": 5})).is_err());
    }
}
