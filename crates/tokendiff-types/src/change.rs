//! Change records produced by a diff.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::snapshot::RecordSnapshot;

/// Compatibility impact of a single change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    Breaking,
    NonBreaking,
}

impl Impact {
    pub fn is_breaking(self) -> bool {
        matches!(self, Self::Breaking)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Breaking => "breaking",
            Self::NonBreaking => "non-breaking",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breaking" => Ok(Self::Breaking),
            "non-breaking" | "nonbreaking" | "non_breaking" => Ok(Self::NonBreaking),
            _ => Err(TypeError::UnknownImpact(s.to_string())),
        }
    }
}

/// A field that differs between two versions of the same record.
///
/// Variant order is the order in which changes are reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldChange {
    Value,
    Raw,
    Ref,
    Type,
    Description,
    Extensions,
    Deprecated,
    References,
    ResolutionPath,
    AppliedAliases,
}

impl FieldChange {
    /// Every field, in reporting order.
    pub const ALL: [FieldChange; 10] = [
        Self::Value,
        Self::Raw,
        Self::Ref,
        Self::Type,
        Self::Description,
        Self::Extensions,
        Self::Deprecated,
        Self::References,
        Self::ResolutionPath,
        Self::AppliedAliases,
    ];

    /// Whether a change to this field alters what the record resolves to,
    /// as opposed to its metadata or provenance.
    pub fn is_value_change(self) -> bool {
        matches!(self, Self::Value | Self::Raw | Self::Ref | Self::Type)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Raw => "raw",
            Self::Ref => "ref",
            Self::Type => "type",
            Self::Description => "description",
            Self::Extensions => "extensions",
            Self::Deprecated => "deprecated",
            Self::References => "references",
            Self::ResolutionPath => "resolutionPath",
            Self::AppliedAliases => "appliedAliases",
        }
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldChange {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypeError::UnknownFieldChange(s.to_string()))
    }
}

/// Which of the four change collections an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
    Renamed,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Renamed => "renamed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "added" => Ok(Self::Added),
            "removed" => Ok(Self::Removed),
            "changed" => Ok(Self::Changed),
            "renamed" => Ok(Self::Renamed),
            _ => Err(TypeError::UnknownChangeKind(s.to_string())),
        }
    }
}

/// A record present only in the next collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Addition {
    pub id: String,
    pub next: RecordSnapshot,
    pub impact: Impact,
}

/// A record present only in the previous collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Removal {
    pub id: String,
    pub previous: RecordSnapshot,
    pub impact: Impact,
}

/// A record present on both sides whose fields differ.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub id: String,
    pub previous: RecordSnapshot,
    pub next: RecordSnapshot,
    /// Differing fields, in [`FieldChange::ALL`] order, each at most once.
    pub changes: Vec<FieldChange>,
    pub impact: Impact,
}

impl Modification {
    /// Whether any change touches what the record resolves to.
    pub fn is_value_change(&self) -> bool {
        self.changes.iter().any(|c| c.is_value_change())
    }
}

/// A removal and an addition paired as the same record under a new identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rename {
    pub previous_id: String,
    pub next_id: String,
    pub previous: RecordSnapshot,
    pub next: RecordSnapshot,
    pub impact: Impact,
}

/// A borrowed view over any change record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChangeRef<'a> {
    Added(&'a Addition),
    Removed(&'a Removal),
    Changed(&'a Modification),
    Renamed(&'a Rename),
}

impl<'a> ChangeRef<'a> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added(_) => ChangeKind::Added,
            Self::Removed(_) => ChangeKind::Removed,
            Self::Changed(_) => ChangeKind::Changed,
            Self::Renamed(_) => ChangeKind::Renamed,
        }
    }

    pub fn impact(&self) -> Impact {
        match self {
            Self::Added(a) => a.impact,
            Self::Removed(r) => r.impact,
            Self::Changed(m) => m.impact,
            Self::Renamed(r) => r.impact,
        }
    }

    /// The previous-side snapshot, if this change has one.
    pub fn previous(&self) -> Option<&'a RecordSnapshot> {
        match self {
            Self::Added(_) => None,
            Self::Removed(r) => Some(&r.previous),
            Self::Changed(m) => Some(&m.previous),
            Self::Renamed(r) => Some(&r.previous),
        }
    }

    /// The next-side snapshot, if this change has one.
    pub fn next(&self) -> Option<&'a RecordSnapshot> {
        match self {
            Self::Added(a) => Some(&a.next),
            Self::Removed(_) => None,
            Self::Changed(m) => Some(&m.next),
            Self::Renamed(r) => Some(&r.next),
        }
    }

    /// The next-side snapshot when present, otherwise the previous side.
    pub fn preferred(&self) -> &'a RecordSnapshot {
        match self {
            Self::Added(a) => &a.next,
            Self::Removed(r) => &r.previous,
            Self::Changed(m) => &m.next,
            Self::Renamed(r) => &r.next,
        }
    }

    pub fn previous_id(&self) -> Option<&'a str> {
        match self {
            Self::Added(_) => None,
            Self::Removed(r) => Some(&r.id),
            Self::Changed(m) => Some(&m.id),
            Self::Renamed(r) => Some(&r.previous_id),
        }
    }

    pub fn next_id(&self) -> Option<&'a str> {
        match self {
            Self::Added(a) => Some(&a.id),
            Self::Removed(_) => None,
            Self::Changed(m) => Some(&m.id),
            Self::Renamed(r) => Some(&r.next_id),
        }
    }
}
