//! Record snapshots: one resolved version of one logical token.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// A reference to a location inside a (possibly external) source document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pointer {
    /// The document the pointer resolves against.
    #[serde(default)]
    pub uri: String,
    /// Fragment pointer inside the document (e.g. `#/color/brand`).
    #[serde(default)]
    pub pointer: String,
    /// Whether the target lives outside the document set being compared.
    #[serde(default)]
    pub external: bool,
}

impl Pointer {
    /// Create a pointer into a local document.
    pub fn local(uri: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            pointer: pointer.into(),
            external: false,
        }
    }

    /// Create a pointer into an external document.
    pub fn external(uri: impl Into<String>, pointer: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            pointer: pointer.into(),
            external: true,
        }
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.uri, self.pointer)
    }
}

/// Deprecation metadata attached to a record.
///
/// A record without deprecation information carries `None` in
/// [`RecordSnapshot::deprecated`]; a `Some` with every field empty still
/// means "deprecated, no details given".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deprecation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<Pointer>,
}

/// One version of one logical record, as produced by the upstream resolver.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    /// Stable identity within a single collection version.
    pub id: String,
    /// Hierarchical name, outermost segment first.
    #[serde(default)]
    pub path: Vec<String>,
    /// Kind of the record (e.g. `color`). `None` is distinct from `""`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Resolved value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Value as authored, before resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    /// Alias target, present when the record points at another record.
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Pointer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolution_path: Vec<Pointer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_aliases: Vec<Pointer>,
}

impl RecordSnapshot {
    /// Create a bare snapshot with an id and a path.
    pub fn new<I, S>(id: impl Into<String>, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            path: path.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Create a snapshot whose path is the id split on `.`.
    pub fn from_dotted(id: impl Into<String>) -> Self {
        let id = id.into();
        let path: Vec<String> = id
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            id,
            path,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn with_deprecation(mut self, deprecation: Deprecation) -> Self {
        self.deprecated = Some(deprecation);
        self
    }

    pub fn with_references(mut self, references: Vec<Pointer>) -> Self {
        self.references = references;
        self
    }

    /// The record's path rendered as a canonical pointer (`#/a/b`).
    pub fn pointer(&self) -> String {
        format_pointer(&self.path)
    }
}

/// Render path segments as a canonical `#/seg/seg` pointer.
///
/// `~` and `/` inside a segment are escaped as `~0` and `~1`.
pub fn format_pointer<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::from("#");
    for segment in segments {
        out.push('/');
        out.push_str(&escape_segment(segment.as_ref()));
    }
    out
}

/// Parse a `#/a/b` or `/a/b` pointer into its unescaped segments.
///
/// A bare `#` or empty string is the root pointer (no segments).
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, TypeError> {
    let body = pointer.strip_prefix('#').unwrap_or(pointer);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let rest = body.strip_prefix('/').ok_or_else(|| TypeError::InvalidPointer {
        pointer: pointer.to_string(),
        reason: "expected '/' after '#'".into(),
    })?;
    rest.split('/')
        .map(|segment| unescape_segment(segment, pointer))
        .collect()
}

fn escape_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape_segment(segment: &str, pointer: &str) -> Result<String, TypeError> {
    let mut out = String::with_capacity(segment.len());
    let mut chars = segment.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            other => {
                return Err(TypeError::InvalidPointer {
                    pointer: pointer.to_string(),
                    reason: match other {
                        Some(c) => format!("invalid escape '~{c}'"),
                        None => "dangling '~' at end of segment".into(),
                    },
                })
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_escapes_special_characters() {
        let path = vec!["a/b".to_string(), "c~d".to_string()];
        assert_eq!(format_pointer(&path), "#/a~1b/c~0d");
    }

    #[test]
    fn root_pointer_has_no_segments() {
        assert_eq!(format_pointer::<&str>(&[]), "#");
        assert!(parse_pointer("#").unwrap().is_empty());
        assert!(parse_pointer("").unwrap().is_empty());
    }

    #[test]
    fn parse_accepts_hash_and_bare_slash_forms() {
        assert_eq!(parse_pointer("#/color/brand").unwrap(), vec!["color", "brand"]);
        assert_eq!(parse_pointer("/color/brand").unwrap(), vec!["color", "brand"]);
        assert_eq!(parse_pointer("#/a~1b/c~0d").unwrap(), vec!["a/b", "c~d"]);
    }

    #[test]
    fn parse_rejects_bad_escapes() {
        let err = parse_pointer("#/a~2").unwrap_err();
        assert!(matches!(err, TypeError::InvalidPointer { .. }));
        assert!(err.to_string().contains("~2"));
        assert!(parse_pointer("#/a~").is_err());
        assert!(parse_pointer("#color").is_err());
    }

    #[test]
    fn snapshot_pointer_uses_path() {
        let s = RecordSnapshot::new("brand", ["color", "brand", "primary"]);
        assert_eq!(s.pointer(), "#/color/brand/primary");
    }

    #[test]
    fn from_dotted_splits_id() {
        let s = RecordSnapshot::from_dotted("space.inset.md");
        assert_eq!(s.id, "space.inset.md");
        assert_eq!(s.path, vec!["space", "inset", "md"]);
    }

    #[test]
    fn serde_uses_wire_names() {
        let s = RecordSnapshot::new("a", ["a"])
            .with_type("color")
            .with_reference("{b}")
            .with_value(json!("#fff"));
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["type"], json!("color"));
        assert_eq!(v["ref"], json!("{b}"));
        assert!(v.get("extensions").is_none());

        let parsed: RecordSnapshot = serde_json::from_value(json!({
            "id": "x",
            "path": ["x"],
            "resolutionPath": [{"uri": "tokens.json", "pointer": "#/x", "external": false}],
            "deprecated": {"reason": "use y", "supersededBy": {"uri": "", "pointer": "#/y"}}
        }))
        .unwrap();
        assert_eq!(parsed.resolution_path.len(), 1);
        let dep = parsed.deprecated.unwrap();
        assert_eq!(dep.reason.as_deref(), Some("use y"));
        assert_eq!(dep.superseded_by.unwrap().pointer, "#/y");
    }

    #[test]
    fn absent_and_empty_type_are_distinct() {
        let untyped = RecordSnapshot::new("a", ["a"]);
        let empty = RecordSnapshot::new("a", ["a"]).with_type("");
        assert_ne!(untyped, empty);
    }
}
