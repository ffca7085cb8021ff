//! Locations inside schemas and instances.
//!
//! A [`Location`] is a sequence of segments that renders as an RFC 6901 JSON
//! pointer (`/metadata/k`, `/tags/1`) and, for human-facing reports, as a
//! field path (`metadata.k`, `tags[1]`).

use std::fmt;

use serde::{Serialize, Serializer};

/// One step into a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocationSegment {
    Property(String),
    Index(usize),
}

impl From<&str> for LocationSegment {
    fn from(s: &str) -> Self {
        Self::Property(s.to_string())
    }
}

impl From<String> for LocationSegment {
    fn from(s: String) -> Self {
        Self::Property(s)
    }
}

impl From<usize> for LocationSegment {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

/// An owned path into a JSON document. The empty location is the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(Vec<LocationSegment>);

impl Location {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Return a new location with `segment` appended.
    pub fn join(&self, segment: impl Into<LocationSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// Parse an RFC 6901 pointer (`""` is the root, otherwise `/a/b~1c`).
    ///
    /// Numeric-looking tokens are kept as properties: without the document,
    /// `/0` is ambiguous between an array index and an object key.
    pub fn from_pointer(pointer: &str) -> Option<Self> {
        if pointer.is_empty() {
            return Some(Self::new());
        }
        let rest = pointer.strip_prefix('/')?;
        let segments = rest
            .split('/')
            .map(|token| LocationSegment::Property(unescape_token(token)))
            .collect();
        Some(Self(segments))
    }

    pub fn segments(&self) -> &[LocationSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&LocationSegment> {
        self.0.last()
    }

    /// RFC 6901 rendering.
    pub fn as_pointer(&self) -> String {
        let mut out = String::new();
        for seg in &self.0 {
            out.push('/');
            match seg {
                LocationSegment::Property(p) => out.push_str(&escape_token(p)),
                LocationSegment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }

    /// Human-facing rendering: `metadata.k`, `tags[1]`, `metadata["a.b"]`.
    /// The root renders as `$`.
    pub fn as_field_path(&self) -> String {
        if self.0.is_empty() {
            return "$".to_string();
        }
        let mut out = String::new();
        for seg in &self.0 {
            match seg {
                LocationSegment::Property(p) if is_plain_identifier(p) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(p);
                }
                LocationSegment::Property(p) => {
                    out.push('[');
                    out.push_str(&serde_json::Value::String(p.clone()).to_string());
                    out.push(']');
                }
                LocationSegment::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_pointer())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_pointer())
    }
}

fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

fn is_plain_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_rendering_escapes() {
        let loc = Location::new().join("a/b").join("m~n").join(3usize);
        assert_eq!(loc.as_pointer(), "/a~1b/m~0n/3");
    }

    #[test]
    fn root_renders_empty_pointer() {
        assert_eq!(Location::new().as_pointer(), "");
        assert_eq!(Location::new().as_field_path(), "$");
    }

    #[test]
    fn field_path_rendering() {
        let loc = Location::new().join("metadata").join("k");
        assert_eq!(loc.as_field_path(), "metadata.k");

        let loc = Location::new().join("tags").join(1usize);
        assert_eq!(loc.as_field_path(), "tags[1]");

        let loc = Location::new().join("metadata").join("a.b");
        assert_eq!(loc.as_field_path(), "metadata[\"a.b\"]");

        let loc = Location::new().join("metadata").join("");
        assert_eq!(loc.as_field_path(), "metadata[\"\"]");
    }

    #[test]
    fn pointer_parsing() {
        let loc = Location::from_pointer("/definitions/a~1b").unwrap();
        assert_eq!(
            loc.segments(),
            &[
                LocationSegment::Property("definitions".into()),
                LocationSegment::Property("a/b".into())
            ]
        );
        assert!(Location::from_pointer("").unwrap().is_root());
        assert!(Location::from_pointer("definitions").is_none());
    }
}
